//! Inclusive calendar date ranges paired with their Julian-date epochs.

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::time::Epoch;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a date range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date `{input}` (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("date increment must be at least 1 day (got {0})")]
    InvalidIncrement(i64),
}

/// Ordered calendar dates from `start` to `end` inclusive, one epoch per date.
///
/// Always holds at least one date, is strictly increasing, and ends exactly on `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    dates: Vec<NaiveDate>,
    epochs: Vec<Epoch>,
    increment_days: i64,
}

impl DateRange {
    /// Step from `start` by `increment_days` while strictly before `end`, then close on `end`.
    pub fn new(start: NaiveDate, end: NaiveDate, increment_days: i64) -> Result<Self, DateRangeError> {
        if increment_days < 1 {
            return Err(DateRangeError::InvalidIncrement(increment_days));
        }
        if end < start {
            return Err(DateRangeError::EndBeforeStart { start, end });
        }

        let step = Days::new(increment_days as u64);
        let mut dates = Vec::new();
        let mut current = Some(start);
        while let Some(date) = current {
            if date >= end {
                break;
            }
            dates.push(date);
            current = date.checked_add_days(step);
        }
        dates.push(end);

        let epochs = dates.iter().copied().map(Epoch::from_date).collect();
        Ok(Self {
            dates,
            epochs,
            increment_days,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn increment_days(&self) -> i64 {
        self.increment_days
    }
}

/// Parse a `YYYY-MM-DD` calendar date; single-digit months and days are accepted.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| DateRangeError::InvalidDate {
        input: input.to_string(),
    })
}

/// Build the inclusive range between two date strings.
pub fn get_range(start: &str, end: &str, increment_days: i64) -> Result<DateRange, DateRangeError> {
    if increment_days < 1 {
        return Err(DateRangeError::InvalidIncrement(increment_days));
    }
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    DateRange::new(start, end, increment_days)
}

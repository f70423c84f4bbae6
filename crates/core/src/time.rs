//! Continuous time as Julian dates.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, NaiveDate};

use crate::constants::{DAYS_PER_CENTURY, J2000_JD, SECONDS_PER_DAY};

/// Julian date of 0000-12-31 00:00 in the proleptic Gregorian calendar, so that
/// `JD = days_from_ce + CE_OFFSET_JD` for midnight epochs.
const CE_OFFSET_JD: f64 = 1_721_424.5;

/// A point in time expressed as a Julian date (days).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Epoch(f64);

impl Epoch {
    pub const J2000: Epoch = Epoch(J2000_JD);

    pub const fn from_julian_date(jd: f64) -> Self {
        Self(jd)
    }

    /// Midnight of the given Gregorian calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(f64::from(date.num_days_from_ce()) + CE_OFFSET_JD)
    }

    pub fn julian_date(self) -> f64 {
        self.0
    }

    /// Calendar date containing this epoch, if representable.
    pub fn to_date(self) -> Option<NaiveDate> {
        let days = (self.0 - CE_OFFSET_JD).floor();
        if !days.is_finite() || days < f64::from(i32::MIN) || days > f64::from(i32::MAX) {
            return None;
        }
        NaiveDate::from_num_days_from_ce_opt(days as i32)
    }

    pub fn days_since_j2000(self) -> f64 {
        self.0 - J2000_JD
    }

    pub fn seconds_since_j2000(self) -> f64 {
        self.days_since_j2000() * SECONDS_PER_DAY
    }

    pub fn centuries_since_j2000(self) -> f64 {
        self.days_since_j2000() / DAYS_PER_CENTURY
    }
}

/// Difference between two epochs in days.
impl Sub for Epoch {
    type Output = f64;

    fn sub(self, rhs: Epoch) -> f64 {
        self.0 - rhs.0
    }
}

/// Advance an epoch by a whole number of days.
impl Add<i64> for Epoch {
    type Output = Epoch;

    fn add(self, days: i64) -> Epoch {
        Epoch(self.0 + days as f64)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.1}", self.0)
    }
}

/// Convert days to seconds.
#[inline]
pub fn days_to_seconds(days: f64) -> f64 {
    days * SECONDS_PER_DAY
}

/// Convert seconds to days.
#[inline]
pub fn seconds_to_days(seconds: f64) -> f64 {
    seconds / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_midnight_is_half_day_before_reference() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let epoch = Epoch::from_date(date);
        assert_eq!(epoch.julian_date(), 2_451_544.5);
        assert_eq!(epoch.to_date(), Some(date));
    }

    #[test]
    fn epoch_arithmetic_is_in_days() {
        let a = Epoch::from_julian_date(2_459_761.5);
        let b = a + 3;
        assert_eq!(b - a, 3.0);
        assert_eq!(days_to_seconds(b - a), 259_200.0);
    }
}

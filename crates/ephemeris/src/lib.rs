//! Ephemeris adapters returning planetary state vectors in batches.
//!
//! Every backend answers one call per body for a whole epoch sequence, and checks
//! the full sequence against its coverage before evaluating anything.

use std::path::PathBuf;
use std::sync::Arc;

use planner_core::vector::Vector3;
use planner_core::{Body, Epoch};
use thiserror::Error;

pub mod kepler;
pub mod kernels;
pub mod spk;

pub use kepler::KeplerianEphemeris;
pub use spk::{Origin, SpkEphemeris};

/// Position and velocity of one body at one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: Vector3,
    pub velocity_km_s: Vector3,
}

/// Errors surfaced while loading or querying an ephemeris.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("{body} ephemeris does not cover {date} (available {first} to {last})")]
    OutOfRange {
        body: Body,
        date: String,
        first: String,
        last: String,
    },
    #[error("kernel is missing at {path}")]
    MissingKernel { path: PathBuf },
    #[error("kernel path {path} is not valid UTF-8 or contains a NUL byte")]
    InvalidKernelPath { path: PathBuf },
    #[error("malformed kernel {path}: {reason}")]
    MalformedKernel { path: PathBuf, reason: String },
    #[error("kernel has no segment for {body}")]
    MissingSegment { body: Body },
    #[error("kernel has no segment for the Sun")]
    MissingSun,
    #[error("SPICE error: {message}")]
    Spice { message: String },
}

/// Batch state lookup for a body.
pub trait Ephemeris: Send + Sync {
    /// States aligned by index with `epochs`.
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        (**self).states(body, epochs)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for Box<E> {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        (**self).states(body, epochs)
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for Arc<E> {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        (**self).states(body, epochs)
    }
}

/// Closed interval of epochs a backend can evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    pub first: Epoch,
    pub last: Epoch,
}

impl Coverage {
    pub fn contains(&self, epoch: Epoch) -> bool {
        epoch >= self.first && epoch <= self.last
    }

    /// Fail on the first epoch outside the interval.
    pub fn check(&self, body: Body, epochs: &[Epoch]) -> Result<(), EphemerisError> {
        match epochs.iter().find(|epoch| !self.contains(**epoch)) {
            Some(&epoch) => Err(self.out_of_range(body, epoch)),
            None => Ok(()),
        }
    }

    pub(crate) fn out_of_range(&self, body: Body, epoch: Epoch) -> EphemerisError {
        EphemerisError::OutOfRange {
            body,
            date: describe(epoch),
            first: describe(self.first),
            last: describe(self.last),
        }
    }
}

/// Calendar date of an epoch, falling back to the Julian date.
pub fn describe(epoch: Epoch) -> String {
    epoch
        .to_date()
        .map(|date| date.to_string())
        .unwrap_or_else(|| epoch.to_string())
}

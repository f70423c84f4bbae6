//! Two-body boundary-value primitive consumed by the grid solver.

use std::sync::Arc;

use lambert_bate::get_velocities;
use planner_core::vector::{Vector3, is_finite};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LambertSolverError {
    #[error("lambert solver failed: {0}")]
    Failure(String),
    #[error("lambert solver returned non-finite velocities")]
    NonFinite,
}

/// Which of the two conic arcs through both positions to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathType {
    /// Transfer angle below 180 degrees (Type 1).
    Short,
    /// Transfer angle above 180 degrees (Type 2).
    Long,
}

impl PathType {
    pub const ALL: [PathType; 2] = [PathType::Short, PathType::Long];

    pub fn is_short(self) -> bool {
        matches!(self, PathType::Short)
    }

    /// Conventional transfer type number: 1 for short, 2 for long.
    pub fn transfer_type(self) -> u8 {
        match self {
            PathType::Short => 1,
            PathType::Long => 2,
        }
    }
}

/// Velocities at both ends of a transfer arc (km/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityPair {
    pub departure_km_s: Vector3,
    pub arrival_km_s: Vector3,
}

/// Single-pair Lambert solve.
///
/// `None` means no boundary solution exists for this geometry and path; callers treat it
/// as an ordinary outcome.
pub trait LambertSolver: Send + Sync {
    fn solve(
        &self,
        mu_km3_s2: f64,
        r0_km: Vector3,
        r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Option<VelocityPair>;
}

impl<L: LambertSolver + ?Sized> LambertSolver for &L {
    fn solve(
        &self,
        mu_km3_s2: f64,
        r0_km: Vector3,
        r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Option<VelocityPair> {
        (**self).solve(mu_km3_s2, r0_km, r1_km, time_of_flight_s, path)
    }
}

impl<L: LambertSolver + ?Sized> LambertSolver for Arc<L> {
    fn solve(
        &self,
        mu_km3_s2: f64,
        r0_km: Vector3,
        r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Option<VelocityPair> {
        (**self).solve(mu_km3_s2, r0_km, r1_km, time_of_flight_s, path)
    }
}

/// Universal-variable solver from the `lambert-bate` crate.
#[derive(Debug, Clone, Copy)]
pub struct BateLambert {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BateLambert {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 500,
        }
    }
}

impl BateLambert {
    /// Solve keeping the failure reason.
    pub fn try_solve(
        &self,
        mu_km3_s2: f64,
        r0_km: Vector3,
        r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Result<VelocityPair, LambertSolverError> {
        let (v0, v1) = get_velocities(
            r0_km,
            r1_km,
            time_of_flight_s,
            mu_km3_s2,
            path.is_short(),
            self.tolerance,
            self.max_iterations,
        )
        .map_err(|e| LambertSolverError::Failure(format!("{e:?}")))?;
        if !is_finite(&v0) || !is_finite(&v1) {
            return Err(LambertSolverError::NonFinite);
        }
        Ok(VelocityPair {
            departure_km_s: v0,
            arrival_km_s: v1,
        })
    }
}

impl LambertSolver for BateLambert {
    fn solve(
        &self,
        mu_km3_s2: f64,
        r0_km: Vector3,
        r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Option<VelocityPair> {
        self.try_solve(mu_km3_s2, r0_km, r1_km, time_of_flight_s, path)
            .ok()
    }
}

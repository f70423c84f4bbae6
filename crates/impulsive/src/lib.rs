//! Impulsive transfer utilities: the Lambert primitive and closed-form Hohmann transfers.

pub mod lambert;
pub mod transfers;

pub use lambert::{BateLambert, LambertSolver, LambertSolverError, PathType, VelocityPair};
pub use transfers::HohmannTransfer;

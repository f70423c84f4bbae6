//! Porkchop transfer grids: the parallel grid solver, its result cache, and request tickets.

pub mod cache;
pub mod generation;
pub mod grid;

pub use cache::{CacheKey, ResultCache};
pub use generation::{RequestGeneration, Ticket};
pub use grid::{
    Cell, Grid, GridError, GridRequest, GridSolver, PathGrids, TransferGrid, TransferMetrics,
    TransferQuery, TransferResult,
};
pub use planner_impulsive::{LambertSolver, PathType, VelocityPair};

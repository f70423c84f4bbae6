//! Mission Planner: porkchop transfer grids between solar-system bodies.
//!
//! The workspace crates are re-exported here so front-ends only need this one
//! dependency. [`Planner`] runs the full configuration-to-chart pipeline.

pub mod logging;
pub mod planner;

pub use planner::{Planner, PlannerError, Porkchop, open_ephemeris};
pub use planner_config as config;
pub use planner_core::{Body, DateRange, DateRangeError, Epoch, constants, get_range, vector};
pub use planner_ephemeris as ephemeris;
pub use planner_export as export;
pub use planner_impulsive as impulsive;
pub use planner_importer as importer;
pub use planner_plot as plot;
pub use planner_transfer as transfer;

//! Departure x arrival grids of Lambert-derived transfer quantities.

use std::time::Instant;

use chrono::NaiveDate;
use planner_core::time::days_to_seconds;
use planner_core::vector::{Vector3, norm, norm_squared, sub};
use planner_core::{Body, DateRange, Epoch};
use planner_ephemeris::{Ephemeris, EphemerisError, StateVector};
use planner_impulsive::{LambertSolver, PathType, VelocityPair};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::CacheKey;

/// Structural failures that abort a grid before any cell is evaluated.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("{window} date range is empty")]
    EmptyRange { window: &'static str },
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidGravitationalParameter(f64),
    #[error("ephemeris lookup failed for {body}: {source}")]
    Ephemeris {
        body: Body,
        #[source]
        source: EphemerisError,
    },
    #[error("ephemeris returned {got} states for {body}, expected {expected}")]
    MisalignedStates {
        body: Body,
        expected: usize,
        got: usize,
    },
}

/// One grid entry. Unsolved cells carry no number at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Solved(f64),
    Unsolved,
}

impl Cell {
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Solved(value) => Some(value),
            Cell::Unsolved => None,
        }
    }

    pub fn is_solved(self) -> bool {
        matches!(self, Cell::Solved(_))
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Unsolved, Cell::Solved)
    }
}

/// Row-major 2-D array indexed `[arrival][departure]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Stack equally sized rows of `cols` cells.
    pub fn from_rows(rows: Vec<Vec<Cell>>, cols: usize) -> Self {
        let n_rows = rows.len();
        let cells: Vec<Cell> = rows.into_iter().flatten().collect();
        debug_assert_eq!(cells.len(), n_rows * cols);
        Self {
            rows: n_rows,
            cols,
            cells,
        }
    }

    /// Number of arrival dates.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of departure dates.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, arrival: usize, departure: usize) -> Option<Cell> {
        if arrival >= self.rows || departure >= self.cols {
            return None;
        }
        Some(self.cells[arrival * self.cols + departure])
    }

    pub fn row(&self, arrival: usize) -> &[Cell] {
        &self.cells[arrival * self.cols..(arrival + 1) * self.cols]
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1))
    }

    /// `(arrival, departure, value)` for every solved cell.
    pub fn solved(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.value().map(|value| (idx / self.cols, idx % self.cols, value))
        })
    }

    pub fn solved_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_solved()).count()
    }

    /// Smallest solved value with its `(arrival, departure)` index.
    pub fn min(&self) -> Option<(usize, usize, f64)> {
        self.solved().min_by(|a, b| a.2.total_cmp(&b.2))
    }

    pub fn max(&self) -> Option<(usize, usize, f64)> {
        self.solved().max_by(|a, b| a.2.total_cmp(&b.2))
    }
}

/// Derived quantities for one path type.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGrids {
    /// Characteristic energy (km²/s²).
    pub c3: Grid,
    /// Arrival hyperbolic excess speed (km/s).
    pub v_infinity: Grid,
    /// `v_infinity + sqrt(c3)` (km/s).
    pub delta_v: Grid,
}

/// Full porkchop result for one pair of bodies and date ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferGrid {
    pub departure_body: Body,
    pub arrival_body: Body,
    pub departure_dates: Vec<NaiveDate>,
    pub arrival_dates: Vec<NaiveDate>,
    pub departure_epochs: Vec<Epoch>,
    pub arrival_epochs: Vec<Epoch>,
    /// Arrival minus departure in days; defined for every cell.
    pub tof_days: Grid,
    pub short: PathGrids,
    pub long: PathGrids,
}

impl TransferGrid {
    pub fn path(&self, path: PathType) -> &PathGrids {
        match path {
            PathType::Short => &self.short,
            PathType::Long => &self.long,
        }
    }

    /// `(rows, cols)`, i.e. `(arrival count, departure count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.tof_days.rows(), self.tof_days.cols())
    }
}

/// Inputs of one Lambert solve. Only constructible with a positive, finite time of flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferQuery {
    mu_km3_s2: f64,
    departure: StateVector,
    arrival: StateVector,
    tof_seconds: f64,
    path: PathType,
}

impl TransferQuery {
    pub fn new(
        mu_km3_s2: f64,
        departure: StateVector,
        arrival: StateVector,
        tof_seconds: f64,
        path: PathType,
    ) -> Option<Self> {
        if !(tof_seconds.is_finite() && tof_seconds > 0.0) {
            return None;
        }
        Some(Self {
            mu_km3_s2,
            departure,
            arrival,
            tof_seconds,
            path,
        })
    }

    pub fn run<L: LambertSolver + ?Sized>(&self, lambert: &L) -> TransferResult {
        match lambert.solve(
            self.mu_km3_s2,
            self.departure.position_km,
            self.arrival.position_km,
            self.tof_seconds,
            self.path,
        ) {
            Some(pair) => TransferResult::Solved(pair),
            None => TransferResult::NoSolution,
        }
    }

    /// C3, arrival v-infinity and the single-impulse delta-V for a solved arc.
    pub fn metrics(&self, pair: &VelocityPair) -> TransferMetrics {
        let departure_excess: Vector3 = sub(&pair.departure_km_s, &self.departure.velocity_km_s);
        let arrival_excess: Vector3 = sub(&pair.arrival_km_s, &self.arrival.velocity_km_s);
        let c3 = norm_squared(&departure_excess);
        let v_infinity = norm(&arrival_excess);
        TransferMetrics {
            c3_km2_s2: c3,
            v_infinity_km_s: v_infinity,
            delta_v_km_s: v_infinity.abs() + c3.sqrt(),
        }
    }
}

/// Outcome of one Lambert solve; `NoSolution` is an ordinary result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferResult {
    Solved(VelocityPair),
    NoSolution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferMetrics {
    pub c3_km2_s2: f64,
    pub v_infinity_km_s: f64,
    pub delta_v_km_s: f64,
}

/// Everything the solver needs for one grid.
#[derive(Debug, Clone, Copy)]
pub struct GridRequest<'a> {
    pub mu_km3_s2: f64,
    pub departure_body: Body,
    pub arrival_body: Body,
    pub departure: &'a DateRange,
    pub arrival: &'a DateRange,
}

impl GridRequest<'_> {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.mu_km3_s2,
            self.departure_body.name(),
            self.arrival_body.name(),
            self.departure.epochs(),
            self.arrival.epochs(),
        )
    }

    fn validate(&self) -> Result<(), GridError> {
        if self.departure.is_empty() {
            return Err(GridError::EmptyRange { window: "departure" });
        }
        if self.arrival.is_empty() {
            return Err(GridError::EmptyRange { window: "arrival" });
        }
        if !(self.mu_km3_s2.is_finite() && self.mu_km3_s2 > 0.0) {
            return Err(GridError::InvalidGravitationalParameter(self.mu_km3_s2));
        }
        Ok(())
    }
}

/// Brute-force porkchop solver over an ephemeris and a Lambert primitive.
#[derive(Debug, Clone)]
pub struct GridSolver<E, L> {
    ephemeris: E,
    lambert: L,
}

/// Cells of one arrival row, in output order.
struct Row {
    tof: Vec<Cell>,
    short: [Vec<Cell>; 3],
    long: [Vec<Cell>; 3],
}

impl<E: Ephemeris, L: LambertSolver> GridSolver<E, L> {
    pub fn new(ephemeris: E, lambert: L) -> Self {
        Self { ephemeris, lambert }
    }

    /// Build every grid for `request`. Fails only on structural problems.
    pub fn solve(&self, request: &GridRequest<'_>) -> Result<TransferGrid, GridError> {
        request.validate()?;
        let started = Instant::now();
        let departure_epochs = request.departure.epochs();
        let arrival_epochs = request.arrival.epochs();

        let departure_states = self.fetch(request.departure_body, departure_epochs)?;
        let arrival_states = self.fetch(request.arrival_body, arrival_epochs)?;
        info!(
            departure = %request.departure_body,
            arrival = %request.arrival_body,
            departures = departure_epochs.len(),
            arrivals = arrival_epochs.len(),
            "solving transfer grid"
        );

        let rows: Vec<Row> = arrival_epochs
            .par_iter()
            .zip(arrival_states.par_iter())
            .map(|(&arrival_epoch, arrival_state)| {
                self.solve_row(
                    request.mu_km3_s2,
                    arrival_epoch,
                    arrival_state,
                    departure_epochs,
                    &departure_states,
                )
            })
            .collect();

        let cols = departure_epochs.len();
        let mut tof = Vec::with_capacity(rows.len());
        let mut short: [Vec<Vec<Cell>>; 3] = Default::default();
        let mut long: [Vec<Vec<Cell>>; 3] = Default::default();
        for row in rows {
            tof.push(row.tof);
            for (column, cells) in short.iter_mut().zip(row.short) {
                column.push(cells);
            }
            for (column, cells) in long.iter_mut().zip(row.long) {
                column.push(cells);
            }
        }
        let to_grids = |[c3, v_infinity, delta_v]: [Vec<Vec<Cell>>; 3]| PathGrids {
            c3: Grid::from_rows(c3, cols),
            v_infinity: Grid::from_rows(v_infinity, cols),
            delta_v: Grid::from_rows(delta_v, cols),
        };

        let grid = TransferGrid {
            departure_body: request.departure_body,
            arrival_body: request.arrival_body,
            departure_dates: request.departure.dates().to_vec(),
            arrival_dates: request.arrival.dates().to_vec(),
            departure_epochs: departure_epochs.to_vec(),
            arrival_epochs: arrival_epochs.to_vec(),
            tof_days: Grid::from_rows(tof, cols),
            short: to_grids(short),
            long: to_grids(long),
        };
        info!(
            short_solved = grid.short.delta_v.solved_count(),
            long_solved = grid.long.delta_v.solved_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "transfer grid complete"
        );
        Ok(grid)
    }

    fn fetch(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, GridError> {
        let states = self
            .ephemeris
            .states(body, epochs)
            .map_err(|source| GridError::Ephemeris { body, source })?;
        if states.len() != epochs.len() {
            return Err(GridError::MisalignedStates {
                body,
                expected: epochs.len(),
                got: states.len(),
            });
        }
        debug!(%body, count = states.len(), "fetched states");
        Ok(states)
    }

    fn solve_row(
        &self,
        mu_km3_s2: f64,
        arrival_epoch: Epoch,
        arrival_state: &StateVector,
        departure_epochs: &[Epoch],
        departure_states: &[StateVector],
    ) -> Row {
        let cols = departure_epochs.len();
        let mut row = Row {
            tof: Vec::with_capacity(cols),
            short: Default::default(),
            long: Default::default(),
        };

        for (&departure_epoch, departure_state) in departure_epochs.iter().zip(departure_states) {
            let tof_days = arrival_epoch - departure_epoch;
            row.tof.push(Cell::Solved(tof_days));

            for path in PathType::ALL {
                let metrics = TransferQuery::new(
                    mu_km3_s2,
                    *departure_state,
                    *arrival_state,
                    days_to_seconds(tof_days),
                    path,
                )
                .and_then(|query| match query.run(&self.lambert) {
                    TransferResult::Solved(pair) => Some(query.metrics(&pair)),
                    TransferResult::NoSolution => None,
                });

                let [c3, v_infinity, delta_v] = match path {
                    PathType::Short => &mut row.short,
                    PathType::Long => &mut row.long,
                };
                c3.push(metrics.map(|m| m.c3_km2_s2).into());
                v_infinity.push(metrics.map(|m| m.v_infinity_km_s).into());
                delta_v.push(metrics.map(|m| m.delta_v_km_s).into());
            }
        }
        row
    }
}

//! Configuration-to-chart pipeline with memoized grids and stale-result suppression.

use std::sync::Arc;

use planner_config::{EphemerisSource, PlannerConfig, StateOrigin};
use planner_ephemeris::{Ephemeris, EphemerisError, KeplerianEphemeris, Origin, SpkEphemeris};
use planner_impulsive::{BateLambert, LambertSolver};
use planner_plot::{PlotAssembly, assemble};
use planner_transfer::{
    GridError, GridRequest, GridSolver, RequestGeneration, ResultCache, TransferGrid,
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Finished chart data for one configuration.
#[derive(Debug, Clone)]
pub struct Porkchop {
    pub title: String,
    pub grid: Arc<TransferGrid>,
    pub assembly: PlotAssembly,
}

/// Build the ephemeris backend a configuration asks for.
pub fn open_ephemeris(source: &EphemerisSource) -> Result<Box<dyn Ephemeris>, EphemerisError> {
    match source {
        EphemerisSource::Analytic => Ok(Box::new(KeplerianEphemeris::new())),
        EphemerisSource::Spk { path, origin } => {
            let origin = match origin {
                StateOrigin::Barycentric => Origin::SolarSystemBarycenter,
                StateOrigin::Heliocentric => Origin::Sun,
            };
            Ok(Box::new(SpkEphemeris::open(path)?.with_origin(origin)))
        }
    }
}

/// Owns one ephemeris, one Lambert primitive, and the grid cache built from them.
pub struct Planner<E, L = BateLambert> {
    ephemeris: E,
    lambert: L,
    cache: ResultCache,
    generation: RequestGeneration,
}

impl<E: Ephemeris> Planner<E, BateLambert> {
    pub fn with_ephemeris(ephemeris: E) -> Self {
        Self::new(ephemeris, BateLambert::default())
    }
}

impl<E: Ephemeris, L: LambertSolver> Planner<E, L> {
    pub fn new(ephemeris: E, lambert: L) -> Self {
        Self {
            ephemeris,
            lambert,
            cache: ResultCache::new(),
            generation: RequestGeneration::new(),
        }
    }

    pub fn lambert(&self) -> &L {
        &self.lambert
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn generation(&self) -> &RequestGeneration {
        &self.generation
    }

    /// Solve (or reuse) the grid for `config` and assemble its series.
    ///
    /// Returns `Ok(None)` when another request began before this one finished.
    pub fn run(&self, config: &PlannerConfig) -> Result<Option<Porkchop>, PlannerError> {
        let ticket = self.generation.begin();
        let request = GridRequest {
            mu_km3_s2: config.mu_km3_s2,
            departure_body: config.departure_body,
            arrival_body: config.arrival_body,
            departure: &config.departure,
            arrival: &config.arrival,
        };

        let grid = self.cache.get_or_compute(request.cache_key(), || {
            GridSolver::new(&self.ephemeris, &self.lambert).solve(&request)
        })?;

        if !self.generation.is_current(ticket) {
            info!("discarding result of a superseded request");
            return Ok(None);
        }

        let assembly = assemble(&grid, &config.plot);
        for notice in &assembly.notices {
            warn!(%notice, "plot notice");
        }
        Ok(Some(Porkchop {
            title: config.title(),
            grid,
            assembly,
        }))
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use mission_planner::Body;
use mission_planner::Epoch;
use mission_planner::config::PlannerConfig;
use mission_planner::ephemeris::{Ephemeris, EphemerisError, StateVector};
use mission_planner::impulsive::{LambertSolver, PathType, VelocityPair};
use mission_planner::vector::Vector3;

/// Same state for every epoch, per body; counts batch calls.
#[derive(Default)]
pub struct FixedStates {
    states: HashMap<Body, StateVector>,
    pub calls: AtomicUsize,
}

impl FixedStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: Body, position_km: Vector3, velocity_km_s: Vector3) -> Self {
        self.states.insert(
            body,
            StateVector {
                position_km,
                velocity_km_s,
            },
        );
        self
    }

    pub fn earth_and_mars() -> Self {
        Self::new()
            .with(Body::Earth, [1.5e8, 0.0, 0.0], [0.0, 29.8, 0.0])
            .with(Body::Mars, [0.0, 2.2e8, 0.0], [-24.1, 0.0, 0.0])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Ephemeris for FixedStates {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self
            .states
            .get(&body)
            .copied()
            .ok_or(EphemerisError::MissingSegment { body })?;
        Ok(vec![state; epochs.len()])
    }
}

/// Replies with fixed velocities per path (or no solution) and counts calls.
pub struct CountingLambert {
    short: Option<VelocityPair>,
    long: Option<VelocityPair>,
    pub calls: AtomicUsize,
}

impl CountingLambert {
    pub fn new(short: Option<VelocityPair>, long: Option<VelocityPair>) -> Self {
        Self {
            short,
            long,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(pair: VelocityPair) -> Self {
        Self::new(Some(pair), Some(pair))
    }

    pub fn never() -> Self {
        Self::new(None, None)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LambertSolver for CountingLambert {
    fn solve(
        &self,
        _mu_km3_s2: f64,
        _r0_km: Vector3,
        _r1_km: Vector3,
        time_of_flight_s: f64,
        path: PathType,
    ) -> Option<VelocityPair> {
        assert!(time_of_flight_s > 0.0, "solver called with tof {time_of_flight_s}");
        self.calls.fetch_add(1, Ordering::SeqCst);
        match path {
            PathType::Short => self.short,
            PathType::Long => self.long,
        }
    }
}

pub fn pair(departure_km_s: Vector3, arrival_km_s: Vector3) -> VelocityPair {
    VelocityPair {
        departure_km_s,
        arrival_km_s,
    }
}

pub fn approx(actual: f64, expected: f64, rel: f64) -> bool {
    (actual - expected).abs() <= rel * expected.abs().max(1e-12)
}

pub const SMALL_CONFIG: &str = r#"
[transfer]
departure_body = "Earth"
arrival_body = "Mars"
increment_days = 2

[transfer.departure_window]
start = "2022-07-01"
end = "2022-07-05"

[transfer.arrival_window]
start = "2023-01-01"
end = "2023-01-01"
"#;

pub fn small_config() -> PlannerConfig {
    PlannerConfig::from_toml_str(SMALL_CONFIG).expect("valid config")
}

//! Closed-form Hohmann transfer between circular, coplanar heliocentric orbits.
//!
//! Used as an analytic reference for the porkchop quantities: the departure excess
//! speed squared is the C3, the arrival excess speed is the v-infinity.

/// Speeds (km/s) and flight time of a Hohmann transfer from radius `r1` to `r2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannTransfer {
    pub departure_circular_km_s: f64,
    pub arrival_circular_km_s: f64,
    /// Transfer-orbit speed at the departure radius.
    pub departure_transfer_km_s: f64,
    /// Transfer-orbit speed at the arrival radius.
    pub arrival_transfer_km_s: f64,
    pub tof_seconds: f64,
}

impl HohmannTransfer {
    /// Returns `None` unless both radii and `mu` are positive and finite.
    pub fn between(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Option<Self> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !(valid(r1_km) && valid(r2_km) && valid(mu_km3_s2)) {
            return None;
        }

        let a_t = 0.5 * (r1_km + r2_km);
        Some(Self {
            departure_circular_km_s: (mu_km3_s2 / r1_km).sqrt(),
            arrival_circular_km_s: (mu_km3_s2 / r2_km).sqrt(),
            departure_transfer_km_s: (mu_km3_s2 * (2.0 / r1_km - 1.0 / a_t)).sqrt(),
            arrival_transfer_km_s: (mu_km3_s2 * (2.0 / r2_km - 1.0 / a_t)).sqrt(),
            tof_seconds: std::f64::consts::PI * (a_t.powi(3) / mu_km3_s2).sqrt(),
        })
    }

    /// Departure hyperbolic excess speed (km/s).
    pub fn departure_excess_km_s(&self) -> f64 {
        (self.departure_transfer_km_s - self.departure_circular_km_s).abs()
    }

    /// Arrival hyperbolic excess speed (km/s).
    pub fn arrival_excess_km_s(&self) -> f64 {
        (self.arrival_circular_km_s - self.arrival_transfer_km_s).abs()
    }

    pub fn c3_km2_s2(&self) -> f64 {
        self.departure_excess_km_s().powi(2)
    }

    /// Sum of both excess speeds, the same convention the porkchop grid uses.
    pub fn delta_v_km_s(&self) -> f64 {
        self.departure_excess_km_s() + self.arrival_excess_km_s()
    }

    pub fn tof_days(&self) -> f64 {
        planner_core::time::seconds_to_days(self.tof_seconds)
    }
}

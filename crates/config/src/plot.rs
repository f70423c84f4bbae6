//! Per-quantity contour display settings.

use serde::Serialize;

use crate::ConfigError;
use crate::color::Rgba;

/// Quantities a porkchop chart can contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    DeltaV,
    VInfinity,
    C3,
    TimeOfFlight,
}

impl Quantity {
    /// Transfer-cost quantities in layering order (drawn first to last).
    pub const COSTS: [Quantity; 3] = [Quantity::DeltaV, Quantity::VInfinity, Quantity::C3];

    pub fn label(self) -> &'static str {
        match self {
            Quantity::DeltaV => "Delta V",
            Quantity::VInfinity => "V Infinity",
            Quantity::C3 => "C3",
            Quantity::TimeOfFlight => "TOF",
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            Quantity::DeltaV | Quantity::VInfinity => "km/s",
            Quantity::C3 => "km2/s2",
            Quantity::TimeOfFlight => "days",
        }
    }

    pub fn default_color(self) -> Rgba {
        match self {
            Quantity::DeltaV => Rgba::GREEN,
            Quantity::VInfinity => Rgba::BLUE,
            Quantity::C3 => Rgba::RED,
            Quantity::TimeOfFlight => Rgba::BLACK,
        }
    }
}

/// Validated contour settings for one quantity.
///
/// `show_labels` is never true while `visible` is false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSpec {
    upper_bound: Option<f64>,
    step: f64,
    show_labels: bool,
    color: Rgba,
    visible: bool,
}

impl PlotSpec {
    /// `upper_bound` of `None` defers the contour end to the data (used for time of flight).
    pub fn new(
        quantity: Quantity,
        upper_bound: Option<f64>,
        step: f64,
        show_labels: bool,
        color: Rgba,
        visible: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(bound) = upper_bound {
            ensure_positive(format!("{} upper bound", quantity.label()), bound)?;
        }
        ensure_positive(format!("{} step", quantity.label()), step)?;
        Ok(Self {
            upper_bound,
            step,
            show_labels: show_labels && visible,
            color,
            visible,
        })
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper_bound
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

/// Display settings for every contourable quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpecs {
    pub delta_v: PlotSpec,
    pub v_infinity: PlotSpec,
    pub c3: PlotSpec,
    pub time_of_flight: PlotSpec,
}

impl PlotSpecs {
    pub fn get(&self, quantity: Quantity) -> &PlotSpec {
        match quantity {
            Quantity::DeltaV => &self.delta_v,
            Quantity::VInfinity => &self.v_infinity,
            Quantity::C3 => &self.c3,
            Quantity::TimeOfFlight => &self.time_of_flight,
        }
    }
}

pub(crate) fn ensure_positive(field: String, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

//! Configuration models and loaders for the Mission Planner.
//!
//! Files are read into the loosely typed [`RawConfig`] (TOML or YAML) and then
//! validated into a [`PlannerConfig`]; nothing downstream ever sees an invalid field.

use std::fs::File;
use std::path::{Path, PathBuf};

use planner_core::constants::MU_SUN_KM3_S2;
use planner_core::{Body, DateRange, DateRangeError, UnknownBodyError, get_range};
use serde::Deserialize;
use thiserror::Error;

pub mod color;
pub mod plot;

pub use color::Rgba;
pub use plot::{PlotSpec, PlotSpecs, Quantity};

use plot::ensure_positive;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid {window} window: {source}")]
    DateRange {
        window: &'static str,
        #[source]
        source: DateRangeError,
    },
    #[error(transparent)]
    UnknownBody(#[from] UnknownBodyError),
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: String, value: f64 },
    #[error("{field}: unrecognized color `{value}`")]
    InvalidColor { field: String, value: String },
}

/// Configuration as written on disk, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub transfer: TransferSection,
    #[serde(default)]
    pub plot: PlotSection,
    #[serde(default)]
    pub ephemeris: EphemerisSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferSection {
    pub departure_body: String,
    pub arrival_body: String,
    #[serde(default = "default_mu")]
    pub mu_km3_s2: f64,
    pub departure_window: WindowSection,
    pub arrival_window: WindowSection,
    #[serde(default = "default_increment")]
    pub increment_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSection {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSection {
    pub delta_v: QuantitySection,
    pub v_infinity: QuantitySection,
    pub c3: QuantitySection,
    pub time_of_flight: TimeOfFlightSection,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSection {
    fn default() -> Self {
        Self {
            delta_v: QuantitySection::default(),
            v_infinity: QuantitySection::default(),
            c3: QuantitySection::default(),
            time_of_flight: TimeOfFlightSection::default(),
            width: 800,
            height: 550,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuantitySection {
    pub upper_bound: f64,
    pub step: f64,
    pub labels: bool,
    pub visible: bool,
    pub color: Option<String>,
}

impl Default for QuantitySection {
    fn default() -> Self {
        Self {
            upper_bound: 50.0,
            step: 1.0,
            labels: true,
            visible: true,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeOfFlightSection {
    pub step: f64,
    pub labels: bool,
    pub visible: bool,
    pub color: Option<String>,
}

impl Default for TimeOfFlightSection {
    fn default() -> Self {
        Self {
            step: 50.0,
            labels: false,
            visible: false,
            color: None,
        }
    }
}

/// Where state vectors come from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum EphemerisSource {
    /// Built-in mean orbital elements; no data files needed.
    #[default]
    Analytic,
    /// JPL SPK kernel such as `de440s.bsp`.
    Spk {
        path: PathBuf,
        #[serde(default)]
        origin: StateOrigin,
    },
}

/// Center SPK states are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateOrigin {
    /// Solar-system barycenter, as stored in the kernel.
    #[default]
    Barycentric,
    /// Sun-centred; the Sun's barycentric state is subtracted.
    Heliocentric,
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

/// Fully validated planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub departure_body: Body,
    pub arrival_body: Body,
    pub mu_km3_s2: f64,
    pub departure: DateRange,
    pub arrival: DateRange,
    pub plot: PlotSpecs,
    pub plot_size: PlotSize,
    pub ephemeris: EphemerisSource,
}

impl PlannerConfig {
    /// Validate every field, rejecting the first invalid one.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let transfer = raw.transfer;
        let departure_body: Body = transfer.departure_body.parse()?;
        let arrival_body: Body = transfer.arrival_body.parse()?;
        ensure_positive("gravitational parameter".to_string(), transfer.mu_km3_s2)?;

        let departure = build_window("departure", &transfer.departure_window, transfer.increment_days)?;
        let arrival = build_window("arrival", &transfer.arrival_window, transfer.increment_days)?;

        let plot = raw.plot;
        if plot.width == 0 || plot.height == 0 {
            return Err(ConfigError::NonPositive {
                field: "plot size".to_string(),
                value: f64::from(plot.width.min(plot.height)),
            });
        }

        let specs = PlotSpecs {
            delta_v: quantity_spec(Quantity::DeltaV, &plot.delta_v)?,
            v_infinity: quantity_spec(Quantity::VInfinity, &plot.v_infinity)?,
            c3: quantity_spec(Quantity::C3, &plot.c3)?,
            time_of_flight: PlotSpec::new(
                Quantity::TimeOfFlight,
                None,
                plot.time_of_flight.step,
                plot.time_of_flight.labels,
                resolve_color(Quantity::TimeOfFlight, plot.time_of_flight.color.as_deref())?,
                plot.time_of_flight.visible,
            )?,
        };

        Ok(Self {
            departure_body,
            arrival_body,
            mu_km3_s2: transfer.mu_km3_s2,
            departure,
            arrival,
            plot: specs,
            plot_size: PlotSize {
                width: plot.width,
                height: plot.height,
            },
            ephemeris: raw.ephemeris,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::from_raw(toml::from_str(contents)?)
    }

    /// Chart title in the form `Mission: Earth to Mars 2022, Type 1, 2 Transfers`.
    pub fn title(&self) -> String {
        format!(
            "Mission: {} to {} {}, Type 1, 2 Transfers",
            self.departure_body,
            self.arrival_body,
            self.departure.start().format("%Y")
        )
    }
}

/// Load the raw configuration from TOML (by extension) or YAML.
pub fn load_raw_config<P: AsRef<Path>>(path: P) -> Result<RawConfig, ConfigError> {
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Load and validate a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig, ConfigError> {
    PlannerConfig::from_raw(load_raw_config(path)?)
}

fn build_window(
    window: &'static str,
    section: &WindowSection,
    increment_days: i64,
) -> Result<DateRange, ConfigError> {
    get_range(&section.start, &section.end, increment_days)
        .map_err(|source| ConfigError::DateRange { window, source })
}

fn quantity_spec(quantity: Quantity, section: &QuantitySection) -> Result<PlotSpec, ConfigError> {
    PlotSpec::new(
        quantity,
        Some(section.upper_bound),
        section.step,
        section.labels,
        resolve_color(quantity, section.color.as_deref())?,
        section.visible,
    )
}

fn resolve_color(quantity: Quantity, requested: Option<&str>) -> Result<Rgba, ConfigError> {
    match requested {
        None => Ok(quantity.default_color()),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidColor {
            field: format!("{} color", quantity.label()),
            value: value.to_string(),
        }),
    }
}

fn default_mu() -> f64 {
    MU_SUN_KM3_S2
}

fn default_increment() -> i64 {
    2
}

//! Ordered contour series for a porkchop chart.
//!
//! Series are emitted delta-V, v-infinity, C3 (long path before short path for each),
//! followed by the time-of-flight series, which is always present so hover lookups keep
//! working even when it is not drawn.

use std::fmt;

use chrono::NaiveDate;
use planner_config::{PlotSpec, PlotSpecs, Quantity, Rgba};
use planner_transfer::{Grid, PathType, TransferGrid};
use serde::{Serialize, Serializer};
use tracing::warn;

const MAX_LEVELS: usize = 1000;

/// One located value on a series grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub departure: NaiveDate,
    pub arrival: NaiveDate,
    pub value: f64,
}

/// Everything a renderer needs to draw one contour trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourSeries {
    pub name: String,
    pub quantity: Quantity,
    #[serde(serialize_with = "serialize_path")]
    pub path: Option<PathType>,
    pub departure_dates: Vec<NaiveDate>,
    pub arrival_dates: Vec<NaiveDate>,
    /// `[arrival][departure]`; `None` marks an unsolved cell.
    pub values: Vec<Vec<Option<f64>>>,
    pub contour_start: f64,
    pub contour_end: f64,
    pub contour_step: f64,
    pub show_labels: bool,
    pub visible: bool,
    pub show_in_legend: bool,
    pub color: Rgba,
    pub hover_template: String,
    /// `(min, max)` over solved cells.
    pub value_range: Option<(f64, f64)>,
    pub minimum: Option<SeriesPoint>,
}

impl ContourSeries {
    /// Contour levels from start to end inclusive.
    pub fn levels(&self) -> Vec<f64> {
        if !self.contour_step.is_finite()
            || self.contour_step <= 0.0
            || self.contour_end < self.contour_start
        {
            return Vec::new();
        }
        let count = ((self.contour_end - self.contour_start) / self.contour_step).floor() as usize;
        (0..=count.min(MAX_LEVELS))
            .map(|k| self.contour_start + k as f64 * self.contour_step)
            .collect()
    }

    /// Drawn at all: visible and not fully transparent.
    pub fn is_drawn(&self) -> bool {
        self.visible && !self.color.is_transparent()
    }
}

/// Conditions worth telling the user about that are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// One path of a visible quantity has no solved cell.
    NoSolutionsInRange {
        quantity: Quantity,
        #[serde(serialize_with = "serialize_path_type")]
        path: PathType,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoSolutionsInRange { quantity, path } => write!(
                f,
                "no Type {} {} solutions in the selected date ranges",
                path.transfer_type(),
                quantity.label()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotAssembly {
    pub series: Vec<ContourSeries>,
    pub notices: Vec<Notice>,
}

impl PlotAssembly {
    pub fn find(&self, quantity: Quantity, path: Option<PathType>) -> Option<&ContourSeries> {
        self.series
            .iter()
            .find(|series| series.quantity == quantity && series.path == path)
    }

    /// Lowest short-path delta-V, if that series is drawn and has any solution.
    pub fn best_delta_v(&self) -> Option<SeriesPoint> {
        self.find(Quantity::DeltaV, Some(PathType::Short))
            .filter(|series| series.is_drawn())
            .and_then(|series| series.minimum)
    }
}

/// Build the ordered series for `grid` under `specs`.
pub fn assemble(grid: &TransferGrid, specs: &PlotSpecs) -> PlotAssembly {
    let mut series = Vec::new();
    let mut notices = Vec::new();

    for quantity in Quantity::COSTS {
        let spec = specs.get(quantity);
        if !spec.visible() {
            continue;
        }
        for path in [PathType::Long, PathType::Short] {
            let next = cost_series(grid, quantity, path, spec);
            if next.value_range.is_none() {
                warn!(
                    quantity = quantity.label(),
                    transfer_type = path.transfer_type(),
                    "no solutions in range"
                );
                notices.push(Notice::NoSolutionsInRange { quantity, path });
            }
            series.push(next);
        }
    }
    series.push(time_of_flight_series(grid, &specs.time_of_flight));

    PlotAssembly { series, notices }
}

fn cost_grid(grid: &TransferGrid, quantity: Quantity, path: PathType) -> &Grid {
    let grids = grid.path(path);
    match quantity {
        Quantity::DeltaV => &grids.delta_v,
        Quantity::VInfinity => &grids.v_infinity,
        Quantity::C3 => &grids.c3,
        Quantity::TimeOfFlight => &grid.tof_days,
    }
}

fn cost_series(
    grid: &TransferGrid,
    quantity: Quantity,
    path: PathType,
    spec: &PlotSpec,
) -> ContourSeries {
    let cells = cost_grid(grid, quantity, path);
    let value_range = value_range(cells);
    ContourSeries {
        name: format!("{} [{}]", quantity.label(), quantity.units()),
        quantity,
        path: Some(path),
        departure_dates: grid.departure_dates.clone(),
        arrival_dates: grid.arrival_dates.clone(),
        values: values(cells),
        contour_start: 0.0,
        contour_end: spec
            .upper_bound()
            .unwrap_or_else(|| value_range.map_or(0.0, |(_, max)| max)),
        contour_step: spec.step(),
        show_labels: spec.show_labels(),
        visible: spec.visible(),
        show_in_legend: path.is_short(),
        color: spec.color(),
        hover_template: format!(
            "{}, Type {}: %{{z}} {}",
            quantity.label(),
            path.transfer_type(),
            quantity.units()
        ),
        value_range,
        minimum: minimum(grid, cells),
    }
}

fn time_of_flight_series(grid: &TransferGrid, spec: &PlotSpec) -> ContourSeries {
    let quantity = Quantity::TimeOfFlight;
    let cells = &grid.tof_days;
    let value_range = value_range(cells);
    let visible = spec.visible();
    ContourSeries {
        name: if visible {
            format!("{} [{}]", quantity.label(), quantity.units())
        } else {
            String::new()
        },
        quantity,
        path: None,
        departure_dates: grid.departure_dates.clone(),
        arrival_dates: grid.arrival_dates.clone(),
        values: values(cells),
        contour_start: 0.0,
        contour_end: value_range.map_or(0.0, |(_, max)| max),
        contour_step: spec.step(),
        show_labels: spec.show_labels() && visible,
        visible,
        show_in_legend: visible,
        color: if visible { spec.color() } else { Rgba::TRANSPARENT },
        hover_template: "%{x} >> %{y}: %{z} days".to_string(),
        value_range,
        minimum: minimum(grid, cells),
    }
}

fn values(cells: &Grid) -> Vec<Vec<Option<f64>>> {
    cells
        .rows_iter()
        .take(cells.rows())
        .map(|row| row.iter().map(|cell| cell.value()).collect())
        .collect()
}

fn value_range(cells: &Grid) -> Option<(f64, f64)> {
    let (_, _, min) = cells.min()?;
    let (_, _, max) = cells.max()?;
    Some((min, max))
}

fn minimum(grid: &TransferGrid, cells: &Grid) -> Option<SeriesPoint> {
    let (arrival, departure, value) = cells.min()?;
    Some(SeriesPoint {
        departure: *grid.departure_dates.get(departure)?,
        arrival: *grid.arrival_dates.get(arrival)?,
        value,
    })
}

fn serialize_path<S: Serializer>(
    path: &Option<PathType>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serialize_path_type(path, serializer),
        None => serializer.serialize_none(),
    }
}

fn serialize_path_type<S: Serializer>(path: &PathType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match path {
        PathType::Short => "short",
        PathType::Long => "long",
    })
}

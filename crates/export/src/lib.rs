//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod grid {
    use std::io::Write;
    use std::path::Path;

    use planner_transfer::TransferGrid;
    use serde::Serialize;

    use crate::{ExportError, writer_for_path};

    /// One CSV row per departure/arrival pair; unsolved quantities are empty fields.
    #[derive(Debug, Clone, Serialize)]
    pub struct Record {
        pub departure_date: String,
        pub arrival_date: String,
        pub departure_jd: f64,
        pub arrival_jd: f64,
        pub tof_days: Option<f64>,
        pub c3_short_km2_s2: Option<f64>,
        pub c3_long_km2_s2: Option<f64>,
        pub vinf_short_km_s: Option<f64>,
        pub vinf_long_km_s: Option<f64>,
        pub dv_short_km_s: Option<f64>,
        pub dv_long_km_s: Option<f64>,
    }

    /// Rows in arrival-major order, matching the grid layout.
    pub fn records(grid: &TransferGrid) -> Vec<Record> {
        let (rows, cols) = grid.shape();
        let mut records = Vec::with_capacity(rows * cols);
        for arrival in 0..rows {
            for departure in 0..cols {
                let value = |cells: &planner_transfer::Grid| {
                    cells.get(arrival, departure).and_then(|cell| cell.value())
                };
                records.push(Record {
                    departure_date: grid.departure_dates[departure].to_string(),
                    arrival_date: grid.arrival_dates[arrival].to_string(),
                    departure_jd: grid.departure_epochs[departure].julian_date(),
                    arrival_jd: grid.arrival_epochs[arrival].julian_date(),
                    tof_days: value(&grid.tof_days),
                    c3_short_km2_s2: value(&grid.short.c3),
                    c3_long_km2_s2: value(&grid.long.c3),
                    vinf_short_km_s: value(&grid.short.v_infinity),
                    vinf_long_km_s: value(&grid.long.v_infinity),
                    dv_short_km_s: value(&grid.short.delta_v),
                    dv_long_km_s: value(&grid.long.delta_v),
                });
            }
        }
        records
    }

    pub fn write_csv<W: Write>(grid: &TransferGrid, writer: W) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in records(grid) {
            csv.serialize(record)?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_csv_to_path(grid: &TransferGrid, path: &Path) -> Result<(), ExportError> {
        write_csv(grid, writer_for_path(path)?)
    }
}

pub mod series {
    use std::io::Write;
    use std::path::Path;

    use planner_plot::PlotAssembly;
    use serde::Serialize;

    use crate::{ExportError, writer_for_path};

    /// JSON envelope for a rendered chart's data.
    #[derive(Debug, Serialize)]
    pub struct SeriesDocument<'a> {
        pub title: &'a str,
        #[serde(flatten)]
        pub assembly: &'a PlotAssembly,
    }

    pub fn write_json<W: Write>(
        title: &str,
        assembly: &PlotAssembly,
        mut writer: W,
    ) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, &SeriesDocument { title, assembly })?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json_to_path(
        title: &str,
        assembly: &PlotAssembly,
        path: &Path,
    ) -> Result<(), ExportError> {
        write_json(title, assembly, writer_for_path(path)?)
    }
}

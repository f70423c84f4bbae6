//! PNG porkchop charts drawn with plotters.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::assemble::{ContourSeries, PlotAssembly};

type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type Point = (f64, f64);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("plot assembly has no series to draw")]
    Empty,
    #[error("failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("drawing failed: {0}")]
    Drawing(String),
}

fn drawing<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Draw every drawn series of `assembly` as contour lines into a PNG at `path`.
pub fn render_png(
    assembly: &PlotAssembly,
    title: &str,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let reference = assembly.series.first().ok_or(RenderError::Empty)?;
    let (Some(&departure_origin), Some(&arrival_origin)) =
        (reference.departure_dates.first(), reference.arrival_dates.first())
    else {
        return Err(RenderError::Empty);
    };
    let x_coords = day_offsets(&reference.departure_dates, departure_origin);
    let y_coords = day_offsets(&reference.arrival_dates, arrival_origin);
    let x_span = x_coords.last().copied().unwrap_or(0.0).max(1.0);
    let y_span = y_coords.last().copied().unwrap_or(0.0).max(1.0);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 20.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 14.0, FontStyle::Normal);
    let level_font = FontDesc::new(font_family, 10.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(title, caption_font)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..x_span, 0.0..y_span)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .x_desc("Launch Date")
        .y_desc("Arrival Date")
        .label_style(label_font.clone())
        .light_line_style(ShapeStyle::from(&RGBColor(238, 238, 238)))
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|d| date_label(departure_origin, *d))
        .y_label_formatter(&|d| date_label(arrival_origin, *d))
        .draw()
        .map_err(drawing)?;

    let mut legend_entries = 0usize;
    for series in assembly.series.iter().filter(|series| series.is_drawn()) {
        if draw_contours(&mut chart, series, &x_coords, &y_coords, &level_font)? {
            legend_entries += 1;
        }
    }

    if let Some(best) = assembly.best_delta_v() {
        let x = offset(best.departure, departure_origin);
        let y = offset(best.arrival, arrival_origin);
        let marker_color = RGBColor(210, 100, 20);
        let half_width = x_span * 0.02;
        let half_height = y_span * 0.02;
        chart
            .draw_series([
                PathElement::new(
                    vec![(x - half_width, y), (x + half_width, y)],
                    ShapeStyle::from(&marker_color).stroke_width(3),
                ),
                PathElement::new(
                    vec![(x, y - half_height), (x, y + half_height)],
                    ShapeStyle::from(&marker_color).stroke_width(3),
                ),
            ])
            .map_err(drawing)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("dV = {:.2} km/s", best.value),
                (x + half_width, y + half_height),
                label_font.clone().color(&marker_color),
            )))
            .map_err(drawing)?;
    }

    if legend_entries > 0 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font(label_font)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(drawing)?;
    }

    root.present().map_err(drawing)?;
    info!(path = %path.display(), "rendered porkchop plot");
    Ok(())
}

/// Returns whether a legend entry was registered.
fn draw_contours(
    chart: &mut Chart<'_, '_>,
    series: &ContourSeries,
    x_coords: &[f64],
    y_coords: &[f64],
    level_font: &FontDesc<'_>,
) -> Result<bool, RenderError> {
    let color = RGBAColor(
        series.color.r,
        series.color.g,
        series.color.b,
        f64::from(series.color.a) / 255.0,
    );
    let style = ShapeStyle::from(&color).stroke_width(1);

    let mut segments = Vec::new();
    let mut label_anchors = Vec::new();
    for level in series.levels() {
        let before = segments.len();
        contour_segments(&series.values, x_coords, y_coords, level, &mut segments);
        if let Some(&(a, b)) = segments.get(before) {
            label_anchors.push((level, ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)));
        }
    }
    if segments.is_empty() {
        return Ok(false);
    }

    let annotation = chart
        .draw_series(
            segments
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![a, b], style)),
        )
        .map_err(drawing)?;
    let in_legend = series.show_in_legend && !series.name.is_empty();
    if in_legend {
        annotation
            .label(series.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if series.show_labels {
        chart
            .draw_series(label_anchors.into_iter().map(|(level, anchor)| {
                Text::new(format!("{level}"), anchor, level_font.clone().color(&color))
            }))
            .map_err(drawing)?;
    }
    Ok(in_legend)
}

/// Marching squares over cells whose four corners are all solved.
fn contour_segments(
    values: &[Vec<Option<f64>>],
    x_coords: &[f64],
    y_coords: &[f64],
    level: f64,
    out: &mut Vec<(Point, Point)>,
) {
    if x_coords.len() < 2 || y_coords.len() < 2 {
        return;
    }
    for i in 0..y_coords.len() - 1 {
        for j in 0..x_coords.len() - 1 {
            let corner = |row: usize, col: usize| values.get(row)?.get(col).copied().flatten();
            let (Some(v0), Some(v1), Some(v2), Some(v3)) = (
                corner(i, j),
                corner(i, j + 1),
                corner(i + 1, j + 1),
                corner(i + 1, j),
            ) else {
                continue;
            };
            let coords = [
                (x_coords[j], y_coords[i]),
                (x_coords[j + 1], y_coords[i]),
                (x_coords[j + 1], y_coords[i + 1]),
                (x_coords[j], y_coords[i + 1]),
            ];
            out.extend(marching_square_segments([v0, v1, v2, v3], coords, level));
        }
    }
}

/// Segments crossing one cell. Corners run counter-clockwise from the lower left;
/// edge `k` joins corner `k` to corner `k + 1`.
fn marching_square_segments(
    values: [f64; 4],
    coords: [Point; 4],
    level: f64,
) -> Vec<(Point, Point)> {
    let case = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v >= level)
        .fold(0u8, |acc, (k, _)| acc | (1 << k));

    let edge_point = |edge: usize| -> Point {
        let (a, b) = (edge, (edge + 1) % 4);
        let (va, vb) = (values[a], values[b]);
        let ((xa, ya), (xb, yb)) = (coords[a], coords[b]);
        if (vb - va).abs() < f64::EPSILON {
            return ((xa + xb) * 0.5, (ya + yb) * 0.5);
        }
        let t = (level - va) / (vb - va);
        (xa + t * (xb - xa), ya + t * (yb - ya))
    };

    let edges: &[(usize, usize)] = match case {
        1 | 14 => &[(3, 0)],
        2 | 13 => &[(0, 1)],
        3 | 12 => &[(3, 1)],
        4 | 11 => &[(1, 2)],
        5 => &[(3, 2), (0, 1)],
        6 | 9 => &[(0, 2)],
        7 | 8 => &[(3, 2)],
        10 => &[(3, 0), (1, 2)],
        _ => &[],
    };
    edges
        .iter()
        .map(|&(e1, e2)| (edge_point(e1), edge_point(e2)))
        .collect()
}

fn day_offsets(dates: &[NaiveDate], origin: NaiveDate) -> Vec<f64> {
    dates.iter().map(|&date| offset(date, origin)).collect()
}

fn offset(date: NaiveDate, origin: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn date_label(origin: NaiveDate, offset_days: f64) -> String {
    origin
        .checked_add_days(Days::new(offset_days.max(0.0).round() as u64))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

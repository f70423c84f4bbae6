//! Turns transfer grids into ordered contour series and draws them.

pub mod assemble;
pub mod render;

pub use assemble::{ContourSeries, Notice, PlotAssembly, SeriesPoint, assemble};
pub use render::{RenderError, render_png};

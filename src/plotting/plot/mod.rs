//! Plot types for visualizing data.

mod errorbar;
mod fill;
mod hline;
mod line;
mod scatter;
mod step;

pub use errorbar::ErrorBars;
pub use fill::FillBetween;
pub use hline::HLine;
pub use line::LinePlot;
pub use scatter::ScatterPlot;
pub use step::StepPlot;

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, LegendEntry, Transform};
use crate::plotting::style::{FillStyle, LineStyle, MarkerStyle};

/// What a plot draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line,
    Step,
    Scatter,
    ErrorBars,
    Fill,
    HLine,
}

/// Trait for plot types that can be rendered.
pub trait Plot: std::fmt::Debug + Send {
    /// Get the data bounds for this plot.
    fn bounds(&self) -> Option<Bounds>;

    /// Get the label for this plot (for legend).
    fn label(&self) -> Option<&str>;

    /// Get the line style for legend display.
    fn line_style(&self) -> Option<LineStyle> {
        None
    }

    /// Get the marker style for legend display.
    fn marker_style(&self) -> Option<MarkerStyle> {
        None
    }

    /// Get the fill style for legend display.
    fn fill_style(&self) -> Option<FillStyle> {
        None
    }

    /// Create a legend entry for this plot.
    fn legend_entry(&self) -> Option<LegendEntry> {
        self.label().map(|label| {
            let mut entry = LegendEntry::new(label);
            if let Some(style) = self.line_style() {
                entry = entry.line_style(style);
            }
            if let Some(style) = self.marker_style() {
                entry = entry.marker_style(style);
            }
            if let Some(style) = self.fill_style() {
                entry = entry.fill_style(style);
            }
            entry
        })
    }

    fn kind(&self) -> PlotKind;

    /// Emit this plot's SVG elements.
    fn render(&self, svg: &mut SvgBackend, transform: &Transform);
}

/// Split a polyline into runs of drawable points.
///
/// A non-finite value (or one the scale cannot represent) ends the current
/// run, so gaps in the data show up as gaps in the line.
pub(crate) fn drawable_runs(
    points: impl IntoIterator<Item = (f64, f64)>,
    transform: &Transform,
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match transform.point(x, y) {
            Some(p) => current.push(p),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

//! Step plot with post-step semantics.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{drawable_runs, Plot, PlotKind};
use crate::plotting::style::{Color, DashPattern, LineStyle};

/// A staircase where `y[i]` holds from `x[i]` until `x[i + 1]`.
#[derive(Debug, Clone)]
pub struct StepPlot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub line_style: LineStyle,
    pub label: Option<String>,
}

impl StepPlot {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        StepPlot {
            x,
            y,
            line_style: LineStyle::default(),
            label: None,
        }
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.line_style.color = color.into();
        self
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.line_style.width = width;
        self
    }

    pub fn linestyle(mut self, dash: DashPattern) -> Self {
        self.line_style.dash = dash;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Expand the vertices into the drawn staircase.
    fn corners(&self) -> Vec<(f64, f64)> {
        let n = self.x.len().min(self.y.len());
        let mut out = Vec::with_capacity(2 * n);
        for i in 0..n {
            if i > 0 {
                // Vertical riser at x[i] from the previous level
                out.push((self.x[i], self.y[i - 1]));
            }
            out.push((self.x[i], self.y[i]));
        }
        out
    }
}

impl Plot for StepPlot {
    fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.x.iter().copied().zip(self.y.iter().copied()))
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn line_style(&self) -> Option<LineStyle> {
        Some(self.line_style.clone())
    }

    fn kind(&self) -> PlotKind {
        PlotKind::Step
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        for run in drawable_runs(self.corners(), transform) {
            svg.draw_polyline(&run, &self.line_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_post_step() {
        let plot = StepPlot::new(vec![0.0, 1.0, 2.0], vec![3.0, 5.0, 5.0]);
        assert_eq!(
            plot.corners(),
            vec![(0.0, 3.0), (1.0, 3.0), (1.0, 5.0), (2.0, 5.0), (2.0, 5.0)]
        );
    }
}

//! Line plot implementation.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{drawable_runs, Plot, PlotKind};
use crate::plotting::style::{Color, DashPattern, LineStyle};

/// Straight segments joining consecutive data points.
#[derive(Debug, Clone)]
pub struct LinePlot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub line_style: LineStyle,
    pub label: Option<String>,
}

impl LinePlot {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        LinePlot {
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
}

impl Plot for LinePlot {
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
        PlotKind::Line
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        let points = self.x.iter().copied().zip(self.y.iter().copied());
        for run in drawable_runs(points, transform) {
            svg.draw_polyline(&run, &self.line_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::scale::{LinearScale, Scale};

    #[test]
    fn test_nan_splits_line() {
        let plot = LinePlot::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, f64::NAN, 2.0, 1.0]);
        let mut xs = LinearScale::auto();
        xs.set_range(0.0, 4.0).unwrap();
        let mut ys = LinearScale::auto();
        ys.set_range(0.0, 2.0).unwrap();
        let transform = Transform::new(&xs, &ys, Bounds::new(0.0, 400.0, 0.0, 200.0));

        let mut svg = SvgBackend::new(400.0, 200.0);
        plot.render(&mut svg, &transform);
        assert_eq!(svg.len(), 2);
        assert_eq!(plot.bounds(), Some(Bounds::new(0.0, 4.0, 1.0, 2.0)));
    }
}

//! Scatter plot implementation.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{Plot, PlotKind};
use crate::plotting::style::{Color, Marker, MarkerStyle};

/// Unconnected markers, one per data point.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub marker_style: MarkerStyle,
    pub label: Option<String>,
}

impl ScatterPlot {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        ScatterPlot {
            x,
            y,
            marker_style: MarkerStyle::default(),
            label: None,
        }
    }

    /// Set the marker fill and edge color.
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.marker_style = self.marker_style.color(color);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker_style.marker = marker;
        self
    }

    /// Set the marker size (diameter in pixels).
    pub fn size(mut self, size: f64) -> Self {
        self.marker_style.size = size;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Plot for ScatterPlot {
    fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(self.x.iter().copied().zip(self.y.iter().copied()))
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn marker_style(&self) -> Option<MarkerStyle> {
        Some(self.marker_style.clone())
    }

    fn kind(&self) -> PlotKind {
        PlotKind::Scatter
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        for (&x, &y) in self.x.iter().zip(self.y.iter()) {
            if let Some((px, py)) = transform.point(x, y) {
                svg.draw_marker(px, py, &self.marker_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::scale::{LinearScale, Scale};

    #[test]
    fn test_skips_undrawable_points() {
        let plot = ScatterPlot::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::INFINITY, 3.0])
            .marker(Marker::Square)
            .color(Color::RED);
        let mut xs = LinearScale::auto();
        xs.set_range(0.0, 2.0).unwrap();
        let mut ys = LinearScale::auto();
        ys.set_range(0.0, 3.0).unwrap();
        let transform = Transform::new(&xs, &ys, Bounds::new(0.0, 100.0, 0.0, 100.0));

        let mut svg = SvgBackend::new(100.0, 100.0);
        plot.render(&mut svg, &transform);
        assert_eq!(svg.len(), 2);
    }
}

//! Horizontal reference line spanning the whole axes.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{Plot, PlotKind};
use crate::plotting::style::LineStyle;

#[derive(Debug, Clone)]
pub struct HLine {
    pub y: f64,
    pub line_style: LineStyle,
}

impl HLine {
    pub fn new(y: f64, line_style: LineStyle) -> Self {
        HLine { y, line_style }
    }
}

impl Plot for HLine {
    // Spans whatever x range the axes ends up with, so it never drives autoscaling
    fn bounds(&self) -> Option<Bounds> {
        None
    }

    fn label(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> PlotKind {
        PlotKind::HLine
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        let py = transform.y(self.y);
        if !py.is_finite() {
            return;
        }
        let pixel = transform.pixel_bounds();
        svg.draw_line(pixel.x_min, py, pixel.x_max, py, &self.line_style);
    }
}

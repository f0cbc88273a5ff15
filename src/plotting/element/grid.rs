//! Grid configuration and rendering.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::Bounds;
use crate::plotting::scale::Scale;
use crate::plotting::style::{Color, LineStyle};

/// Configuration for grid lines.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub visible: bool,
    pub style: LineStyle,
    pub show_x: bool,
    pub show_y: bool,
}

impl GridConfig {
    /// Set the grid color and opacity.
    pub fn color(mut self, color: impl Into<Color>, opacity: f64) -> Self {
        self.style.color = color.into();
        self.style.opacity = opacity;
        self
    }

    /// Draw grid lines at the tick positions of both scales.
    pub fn render(
        &self,
        svg: &mut SvgBackend,
        x: (&dyn Scale, usize),
        y: (&dyn Scale, usize),
        pixel: &Bounds,
    ) {
        if !self.visible {
            return;
        }
        if self.show_x {
            let (scale, n) = x;
            for tick in scale.ticks(n) {
                let px = pixel.x_min + scale.transform(tick) * pixel.width();
                if px.is_finite() {
                    svg.draw_line(px, pixel.y_min, px, pixel.y_max, &self.style);
                }
            }
        }
        if self.show_y {
            let (scale, n) = y;
            for tick in scale.ticks(n) {
                let py = pixel.y_max - scale.transform(tick) * pixel.height();
                if py.is_finite() {
                    svg.draw_line(pixel.x_min, py, pixel.x_max, py, &self.style);
                }
            }
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            visible: false,
            style: LineStyle::new().color(Color::LIGHT_GRAY).width(0.5),
            show_x: true,
            show_y: true,
        }
    }
}

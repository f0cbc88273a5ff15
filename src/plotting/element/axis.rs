//! Axis configuration and rendering.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::Bounds;
use crate::plotting::scale::{Scale, ScaleKind};
use crate::plotting::style::{Color, LineStyle, TextAnchor, TextStyle};

/// Configuration for an axis.
#[derive(Debug, Clone)]
pub struct AxisConfig {
    /// Whether the axis is visible
    pub visible: bool,
    /// Axis line style
    pub line_style: LineStyle,
    /// Length of tick marks in pixels
    pub tick_length: f64,
    /// Whether tick values are printed next to the ticks
    pub show_tick_labels: bool,
    /// Style for tick labels
    pub tick_label_style: TextStyle,
    /// Maximum number of ticks to generate
    pub num_ticks: usize,
    /// Padding between tick marks and labels
    pub tick_padding: f64,
}

impl AxisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format a tick value as a label.
    pub fn format_tick(&self, value: f64, kind: ScaleKind) -> String {
        if value == 0.0 {
            return "0".to_string();
        }
        if kind == ScaleKind::Log {
            let exponent = value.log10();
            if exponent.fract() == 0.0 && exponent.abs() >= 3.0 {
                return format!("1e{}", exponent as i32);
            }
        }
        if value.abs() >= 1e5 || value.abs() < 1e-3 {
            format!("{:.1e}", value)
        } else if value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            // Shortest representation that survives the tick spacing noise
            let s = format!("{:.4}", value);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }

    /// Draw a horizontal axis along the bottom edge of `pixel`.
    pub fn render_x(&self, svg: &mut SvgBackend, scale: &dyn Scale, pixel: &Bounds) {
        if !self.visible {
            return;
        }
        svg.draw_line(pixel.x_min, pixel.y_max, pixel.x_max, pixel.y_max, &self.line_style);

        let tick_style = self.tick_mark_style();
        let label_style = self.tick_label_style.clone().anchor(TextAnchor::Middle);
        for tick in scale.ticks(self.num_ticks) {
            let px = pixel.x_min + scale.transform(tick) * pixel.width();
            if !px.is_finite() {
                continue;
            }
            svg.draw_line(px, pixel.y_max, px, pixel.y_max + self.tick_length, &tick_style);
            if self.show_tick_labels {
                svg.draw_text(
                    px,
                    pixel.y_max + self.tick_length + self.tick_padding + label_style.font_size,
                    &self.format_tick(tick, scale.kind()),
                    &label_style,
                );
            }
        }
        // Frame the top edge as well
        svg.draw_line(pixel.x_min, pixel.y_min, pixel.x_max, pixel.y_min, &self.line_style);
    }

    /// Draw a vertical axis along the left edge of `pixel`.
    pub fn render_y(&self, svg: &mut SvgBackend, scale: &dyn Scale, pixel: &Bounds) {
        if !self.visible {
            return;
        }
        svg.draw_line(pixel.x_min, pixel.y_min, pixel.x_min, pixel.y_max, &self.line_style);

        let tick_style = self.tick_mark_style();
        let label_style = self.tick_label_style.clone().anchor(TextAnchor::End);
        for tick in scale.ticks(self.num_ticks) {
            let py = pixel.y_max - scale.transform(tick) * pixel.height();
            if !py.is_finite() {
                continue;
            }
            svg.draw_line(pixel.x_min - self.tick_length, py, pixel.x_min, py, &tick_style);
            if self.show_tick_labels {
                svg.draw_text_with(
                    pixel.x_min - self.tick_length - self.tick_padding,
                    py,
                    &self.format_tick(tick, scale.kind()),
                    &label_style,
                    "dominant-baseline=\"middle\"",
                );
            }
        }
        svg.draw_line(pixel.x_max, pixel.y_min, pixel.x_max, pixel.y_max, &self.line_style);
    }

    fn tick_mark_style(&self) -> LineStyle {
        self.line_style.clone().width(1.0)
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        AxisConfig {
            visible: true,
            line_style: LineStyle::new().color(Color::BLACK).width(1.0),
            tick_length: 5.0,
            show_tick_labels: true,
            tick_label_style: TextStyle::new().font_size(10.0),
            num_ticks: 6,
            tick_padding: 3.0,
        }
    }
}

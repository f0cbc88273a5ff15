//! Marker shapes for point series.

use std::f64::consts::{FRAC_PI_2, PI};

use super::color::Color;

/// Marker shapes for data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    /// Upward-pointing triangle
    Triangle,
    /// Downward-pointing triangle
    TriangleDown,
    Diamond,
    Plus,
    Cross,
    Star,
    Pentagon,
    Hexagon,
}

impl Marker {
    /// Parse a backend-native glyph (`o`, `s`, `^`, `v`, `D`, `+`, `x`, `*`, `p`, `h`).
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph.trim() {
            "o" | "." => Some(Marker::Circle),
            "s" => Some(Marker::Square),
            "^" => Some(Marker::Triangle),
            "v" => Some(Marker::TriangleDown),
            "D" | "d" => Some(Marker::Diamond),
            "+" => Some(Marker::Plus),
            "x" | "X" => Some(Marker::Cross),
            "*" => Some(Marker::Star),
            "p" => Some(Marker::Pentagon),
            "h" | "H" => Some(Marker::Hexagon),
            _ => None,
        }
    }

    /// SVG path data for the marker centered at the origin, `r` being the radius.
    ///
    /// Circles are drawn with `<circle>` and return `None`.
    pub fn to_svg_path(&self, r: f64) -> Option<String> {
        match self {
            Marker::Circle => None,
            Marker::Square => Some(format!(
                "M{:.2},{:.2} L{:.2},{:.2} L{:.2},{:.2} L{:.2},{:.2} Z",
                -r, -r, r, -r, r, r, -r, r
            )),
            Marker::Triangle => {
                let h = r * 1.1547;
                Some(format!(
                    "M0,{:.2} L{:.2},{:.2} L{:.2},{:.2} Z",
                    -h, -r, h * 0.5, r, h * 0.5
                ))
            }
            Marker::TriangleDown => {
                let h = r * 1.1547;
                Some(format!(
                    "M0,{:.2} L{:.2},{:.2} L{:.2},{:.2} Z",
                    h, -r, -h * 0.5, r, -h * 0.5
                ))
            }
            Marker::Diamond => {
                let s = r * 1.2;
                Some(format!("M0,{:.2} L{:.2},0 L0,{:.2} L{:.2},0 Z", -s, s, s, -s))
            }
            Marker::Plus => Some(format!(
                "M{:.2},0 L{:.2},0 M0,{:.2} L0,{:.2}",
                -r, r, -r, r
            )),
            Marker::Cross => {
                let s = r * 0.707;
                Some(format!(
                    "M{:.2},{:.2} L{:.2},{:.2} M{:.2},{:.2} L{:.2},{:.2}",
                    -s, -s, s, s, -s, s, s, -s
                ))
            }
            Marker::Star => Some(polygon_path(10, |i| {
                let radius = if i % 2 == 0 { r } else { r * 0.4 };
                (radius, PI * i as f64 / 5.0 - FRAC_PI_2)
            })),
            Marker::Pentagon => Some(polygon_path(5, |i| {
                (r, 2.0 * PI * i as f64 / 5.0 - FRAC_PI_2)
            })),
            Marker::Hexagon => Some(polygon_path(6, |i| (r, PI * i as f64 / 3.0))),
        }
    }
}

/// Closed polygon through `n` vertices given in polar form.
fn polygon_path(n: usize, vertex: impl Fn(usize) -> (f64, f64)) -> String {
    let mut path = String::new();
    for i in 0..n {
        let (radius, angle) = vertex(i);
        let cmd = if i == 0 { "M" } else { " L" };
        path.push_str(&format!(
            "{}{:.2},{:.2}",
            cmd,
            radius * angle.cos(),
            radius * angle.sin()
        ));
    }
    path.push_str(" Z");
    path
}

/// Style configuration for markers.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// The marker shape
    pub marker: Marker,
    /// Marker size (diameter in pixels)
    pub size: f64,
    /// Fill color
    pub fill: Color,
    /// Edge/stroke color
    pub edge_color: Color,
    /// Edge/stroke width
    pub edge_width: f64,
}

impl MarkerStyle {
    /// Create a new marker style.
    pub fn new(marker: Marker) -> Self {
        MarkerStyle {
            marker,
            ..Default::default()
        }
    }

    /// Set the marker size.
    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set fill and edge color together.
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        let c = color.into();
        self.fill = c.clone();
        self.edge_color = c;
        self
    }

    /// Generate SVG style attributes.
    pub fn to_svg_style(&self) -> String {
        // Line-only glyphs have no interior to fill
        let fill = match self.marker {
            Marker::Plus | Marker::Cross => "none".to_string(),
            _ => self.fill.to_svg_string(),
        };
        format!(
            "fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
            fill,
            self.edge_color.to_svg_string(),
            self.edge_width
        )
    }

    /// Render the marker at a pixel position, returning SVG elements.
    pub fn render_at(&self, x: f64, y: f64) -> String {
        let style = self.to_svg_style();
        let radius = self.size / 2.0;

        match self.marker.to_svg_path(radius) {
            None => format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" {}/>\n",
                x, y, radius, style
            ),
            Some(path) => format!(
                "<path d=\"{}\" transform=\"translate({:.2},{:.2})\" {}/>\n",
                path, x, y, style
            ),
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            marker: Marker::Circle,
            size: 7.0,
            fill: Color::default(),
            edge_color: Color::default(),
            edge_width: 1.0,
        }
    }
}

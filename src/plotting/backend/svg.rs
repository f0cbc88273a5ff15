//! SVG rendering backend.

use crate::plotting::element::text::escape_xml;
use crate::plotting::style::{Color, FillStyle, LineStyle, MarkerStyle, TextStyle};

/// Accumulates SVG elements for one figure.
#[derive(Debug)]
pub struct SvgBackend {
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    content: Vec<String>,
    /// Clip paths referenced from `content`
    defs: Vec<String>,
}

impl SvgBackend {
    /// Create a new SVG backend with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        SvgBackend {
            width,
            height,
            content: Vec::new(),
            defs: Vec::new(),
        }
    }

    /// Fill the whole canvas with a color.
    pub fn fill_background(&mut self, color: &Color) {
        self.content.push(format!(
            "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            self.width,
            self.height,
            color.to_svg_string()
        ));
    }

    /// Draw a line between two points.
    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.content.push(format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" {}/>",
            x1,
            y1,
            x2,
            y2,
            style.to_svg_style()
        ));
    }

    /// Draw a polyline. Fewer than two points draw nothing.
    pub fn draw_polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }

        let points_str: String = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ");

        self.content.push(format!(
            "<polyline points=\"{}\" {}/>",
            points_str,
            style.to_svg_style()
        ));
    }

    /// Draw a closed, filled polygon.
    pub fn draw_polygon(&mut self, points: &[(f64, f64)], style: &FillStyle) {
        if points.len() < 3 {
            return;
        }

        let points_str: String = points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ");

        self.content.push(format!(
            "<polygon points=\"{}\" {}/>",
            points_str,
            style.to_svg_style()
        ));
    }

    /// Draw a rectangle.
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: &FillStyle) {
        self.content.push(format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {}/>",
            x,
            y,
            width,
            height,
            style.to_svg_style()
        ));
    }

    /// Draw a marker glyph centred on a pixel position.
    pub fn draw_marker(&mut self, x: f64, y: f64, style: &MarkerStyle) {
        self.content.push(style.render_at(x, y).trim_end().to_string());
    }

    /// Draw text.
    pub fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.draw_text_with(x, y, text, style, "");
    }

    /// Draw text with extra raw attributes (e.g. `dominant-baseline`).
    pub fn draw_text_with(&mut self, x: f64, y: f64, text: &str, style: &TextStyle, extra: &str) {
        let transform = if style.rotation != 0.0 {
            format!(" transform=\"rotate({},{:.2},{:.2})\"", style.rotation, x, y)
        } else {
            String::new()
        };
        let extra = if extra.is_empty() {
            String::new()
        } else {
            format!(" {}", extra)
        };

        self.content.push(format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" {}{}{}>{}</text>",
            x,
            y,
            style.to_svg_attrs(),
            extra,
            transform,
            escape_xml(text)
        ));
    }

    /// Start a clip region; everything until `end_clip` is clipped to the rectangle.
    pub fn start_clip(&mut self, id: &str, x: f64, y: f64, width: f64, height: f64) {
        self.defs.push(format!(
            "<clipPath id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath>",
            id, x, y, width, height
        ));
        self.content.push(format!("<g clip-path=\"url(#{})\">", id));
    }

    pub fn end_clip(&mut self) {
        self.content.push("</g>".to_string());
    }

    /// Number of elements emitted so far.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Render the final SVG document.
    pub fn render(self) -> String {
        let defs_section = if self.defs.is_empty() {
            String::new()
        } else {
            format!("  <defs>\n    {}\n  </defs>\n", self.defs.join("\n    "))
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
{}  {}
</svg>
"#,
            self.width,
            self.height,
            self.width,
            self.height,
            defs_section,
            self.content.join("\n  ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_document() {
        let mut svg = SvgBackend::new(100.0, 50.0);
        svg.start_clip("c0", 0.0, 0.0, 10.0, 10.0);
        svg.draw_polyline(&[(0.0, 0.0), (1.0, 1.0)], &LineStyle::default());
        svg.draw_polyline(&[(0.0, 0.0)], &LineStyle::default());
        svg.end_clip();
        assert_eq!(svg.len(), 3);

        let doc = svg.render();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<clipPath id=\"c0\">"));
        assert!(doc.contains("<polyline points=\"0.00,0.00 1.00,1.00\""));
        assert!(doc.trim_end().ends_with("</svg>"));
    }
}

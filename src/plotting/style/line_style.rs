//! Line styling options.

use super::color::Color;

/// Dash pattern for lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashPattern {
    /// Solid line
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Alternating dash-dot pattern
    DashDot,
    /// Custom dash array [dash_length, gap_length, ...]
    Custom(Vec<f64>),
}

impl DashPattern {
    /// Convert to SVG stroke-dasharray value.
    pub fn to_svg_dasharray(&self) -> Option<String> {
        match self {
            DashPattern::Solid => None,
            DashPattern::Dashed => Some("8,4".to_string()),
            DashPattern::Dotted => Some("2,2".to_string()),
            DashPattern::DashDot => Some("8,4,2,4".to_string()),
            DashPattern::Custom(arr) if arr.is_empty() => None,
            DashPattern::Custom(arr) => Some(
                arr.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// Parse a symbolic dash code (`-`, `--`, `-.`, `:`).
    ///
    /// Only exact codes are accepted; legacy names such as `dashed` must be
    /// translated to their code first.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "-" => Some(DashPattern::Solid),
            "--" => Some(DashPattern::Dashed),
            "-." => Some(DashPattern::DashDot),
            ":" => Some(DashPattern::Dotted),
            _ => None,
        }
    }
}

/// Style configuration for lines.
#[derive(Debug, Clone)]
pub struct LineStyle {
    /// Line color
    pub color: Color,
    /// Line width in pixels
    pub width: f64,
    /// Dash pattern
    pub dash: DashPattern,
    /// Opacity (0.0 - 1.0)
    pub opacity: f64,
}

impl LineStyle {
    /// Create a new line style with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line color.
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the line width.
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the dash pattern.
    pub fn dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    /// Generate SVG style attributes.
    pub fn to_svg_style(&self) -> String {
        let mut attrs = vec![
            format!("stroke=\"{}\"", self.color.to_svg_string()),
            format!("stroke-width=\"{}\"", self.width),
            "stroke-linejoin=\"miter\"".to_string(),
            "fill=\"none\"".to_string(),
        ];

        if self.opacity < 1.0 {
            attrs.push(format!("stroke-opacity=\"{}\"", self.opacity));
        }

        if let Some(dasharray) = self.dash.to_svg_dasharray() {
            attrs.push(format!("stroke-dasharray=\"{}\"", dasharray));
        }

        attrs.join(" ")
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: Color::default(),
            width: 1.4,
            dash: DashPattern::Solid,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_codes() {
        assert_eq!(DashPattern::from_code("-"), Some(DashPattern::Solid));
        assert_eq!(DashPattern::from_code("--"), Some(DashPattern::Dashed));
        assert_eq!(DashPattern::from_code("-."), Some(DashPattern::DashDot));
        assert_eq!(DashPattern::from_code(":"), Some(DashPattern::Dotted));
        assert_eq!(DashPattern::from_code("dashed"), None);
    }

    #[test]
    fn test_svg_style_includes_dasharray() {
        let style = LineStyle::new().dash(DashPattern::Dashed).to_svg_style();
        assert!(style.contains("stroke-dasharray=\"8,4\""));
        assert!(!LineStyle::new().to_svg_style().contains("dasharray"));
    }
}

//! Legend configuration and rendering.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::Bounds;
use crate::plotting::style::{Color, FillStyle, LineStyle, MarkerStyle, TextStyle};

/// Position of the legend inside the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
    Right,
    CenterLeft,
    CenterRight,
    BottomCenter,
    TopCenter,
    Center,
}

impl LegendPosition {
    /// Parse a location name or numeric code (`"upper right"`, `"lower left"`, `"3"`).
    ///
    /// `"best"` has no layout search behind it and resolves to the top right.
    pub fn from_loc(loc: &str) -> Option<Self> {
        let loc = loc.trim().to_ascii_lowercase();
        let pos = match loc.as_str() {
            "best" | "0" | "upper right" | "1" => LegendPosition::TopRight,
            "upper left" | "2" => LegendPosition::TopLeft,
            "lower left" | "3" => LegendPosition::BottomLeft,
            "lower right" | "4" => LegendPosition::BottomRight,
            "right" | "5" => LegendPosition::Right,
            "center left" | "6" => LegendPosition::CenterLeft,
            "center right" | "7" => LegendPosition::CenterRight,
            "lower center" | "8" => LegendPosition::BottomCenter,
            "upper center" | "9" => LegendPosition::TopCenter,
            "center" | "10" => LegendPosition::Center,
            _ => return None,
        };
        Some(pos)
    }

    /// Anchor point in normalized axes coordinates (y up).
    fn anchor(&self) -> (f64, f64) {
        match self {
            LegendPosition::TopLeft => (0.0, 1.0),
            LegendPosition::TopRight => (1.0, 1.0),
            LegendPosition::BottomLeft => (0.0, 0.0),
            LegendPosition::BottomRight => (1.0, 0.0),
            LegendPosition::TopCenter => (0.5, 1.0),
            LegendPosition::BottomCenter => (0.5, 0.0),
            LegendPosition::CenterLeft => (0.0, 0.5),
            LegendPosition::Right | LegendPosition::CenterRight => (1.0, 0.5),
            LegendPosition::Center => (0.5, 0.5),
        }
    }
}

/// A single entry in the legend.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub line_style: Option<LineStyle>,
    pub marker_style: Option<MarkerStyle>,
    pub fill_style: Option<FillStyle>,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>) -> Self {
        LegendEntry {
            label: label.into(),
            line_style: None,
            marker_style: None,
            fill_style: None,
        }
    }

    pub fn line_style(mut self, style: LineStyle) -> Self {
        self.line_style = Some(style);
        self
    }

    pub fn marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = Some(style);
        self
    }

    pub fn fill_style(mut self, style: FillStyle) -> Self {
        self.fill_style = Some(style);
        self
    }
}

/// Legend configuration.
#[derive(Debug, Clone)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub position: LegendPosition,
    pub visible: bool,
    pub background: FillStyle,
    pub text_style: TextStyle,
    /// Padding inside the legend box and from the axes frame
    pub padding: f64,
    /// Length of the line sample in the legend
    pub line_length: f64,
    /// Gap between line/marker and label
    pub label_gap: f64,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: LegendEntry) {
        self.entries.push(entry);
    }

    pub fn position(mut self, position: LegendPosition) -> Self {
        self.position = position;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Draw the legend box inside the plot area `pixel`.
    pub fn render(&self, svg: &mut SvgBackend, pixel: &Bounds) {
        if !self.visible || self.entries.is_empty() {
            return;
        }

        let font_size = self.text_style.font_size;
        let line_height = font_size * 1.5;
        // No font metrics available: estimate glyph width from the font size
        let longest = self
            .entries
            .iter()
            .map(|e| e.label.chars().count())
            .max()
            .unwrap_or(0) as f64;
        let width = self.padding * 2.0 + self.line_length + self.label_gap + longest * font_size * 0.55;
        let height = self.padding * 2.0 + self.entries.len() as f64 * line_height;

        let (ax, ay) = self.position.anchor();
        let free_w = pixel.width() - width - 2.0 * self.padding;
        let free_h = pixel.height() - height - 2.0 * self.padding;
        let lx = pixel.x_min + self.padding + ax * free_w;
        let ly = pixel.y_min + self.padding + (1.0 - ay) * free_h;

        svg.draw_rect(lx, ly, width, height, &self.background);

        for (i, entry) in self.entries.iter().enumerate() {
            let ey = ly + self.padding + (i as f64 + 0.5) * line_height;
            let x1 = lx + self.padding;
            let x2 = x1 + self.line_length;
            let mid = (x1 + x2) / 2.0;

            if let Some(ref fill) = entry.fill_style {
                let h = font_size * 0.7;
                svg.draw_rect(x1, ey - h / 2.0, self.line_length, h, fill);
            }
            if let Some(ref line) = entry.line_style {
                svg.draw_line(x1, ey, x2, ey, line);
            }
            if let Some(ref marker) = entry.marker_style {
                svg.draw_marker(mid, ey, marker);
            }

            svg.draw_text_with(
                x2 + self.label_gap,
                ey,
                &entry.label,
                &self.text_style,
                "dominant-baseline=\"middle\"",
            );
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Legend {
            entries: Vec::new(),
            position: LegendPosition::TopRight,
            visible: true,
            background: FillStyle::new(Color::WHITE)
                .opacity(0.8)
                .stroke(Color::LIGHT_GRAY)
                .stroke_width(0.8),
            text_style: TextStyle::new().font_size(10.0),
            padding: 6.0,
            line_length: 24.0,
            label_gap: 6.0,
        }
    }
}

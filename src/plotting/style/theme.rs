//! Predefined themes for figures.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::text_style::TextStyle;

/// Predefined plot themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// White background, black frame, no grid
    #[default]
    Default,
    /// Gray frame and light grid
    Minimal,
    /// Heavier strokes and larger text
    HighContrast,
}

/// Theme configuration containing all style settings.
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Background color for the figure
    pub background: Color,
    /// Background color for the plot area
    pub plot_background: Color,
    /// Color for axis lines and ticks
    pub axis_color: Color,
    pub axis_width: f64,
    pub grid_color: Color,
    pub grid_opacity: f64,
    /// Whether new axes show a grid
    pub show_grid: bool,
    pub title_style: TextStyle,
    pub label_style: TextStyle,
    pub tick_style: TextStyle,
}

impl Theme {
    /// Get the configuration for this theme.
    pub fn config(&self) -> ThemeConfig {
        match self {
            Theme::Default => ThemeConfig::default_theme(),
            Theme::Minimal => ThemeConfig::minimal_theme(),
            Theme::HighContrast => ThemeConfig::high_contrast_theme(),
        }
    }
}

impl ThemeConfig {
    fn default_theme() -> Self {
        ThemeConfig {
            background: Color::WHITE,
            plot_background: Color::WHITE,
            axis_color: Color::BLACK,
            axis_width: 1.0,
            grid_color: Color::LIGHT_GRAY,
            grid_opacity: 0.8,
            show_grid: false,
            title_style: TextStyle::new().font_size(17.0),
            label_style: TextStyle::new().font_size(17.0),
            tick_style: TextStyle::new().font_size(13.0),
        }
    }

    fn minimal_theme() -> Self {
        ThemeConfig {
            axis_color: Color::GRAY,
            axis_width: 0.5,
            grid_opacity: 0.3,
            show_grid: true,
            title_style: TextStyle::new().font_size(15.0).color(Color::DARK_GRAY),
            label_style: TextStyle::new().font_size(14.0).color(Color::DARK_GRAY),
            tick_style: TextStyle::new().font_size(11.0).color(Color::GRAY),
            ..Self::default_theme()
        }
    }

    fn high_contrast_theme() -> Self {
        ThemeConfig {
            axis_width: 2.0,
            title_style: TextStyle::new().font_size(19.0).bold(),
            label_style: TextStyle::new().font_size(18.0).bold(),
            tick_style: TextStyle::new().font_size(15.0),
            ..Self::default_theme()
        }
    }

    /// Apply a font family and base size to every text role.
    ///
    /// Tick labels keep their size relative to the base size.
    pub fn with_font(mut self, family: &str, base_size: f64) -> Self {
        let tick_ratio = self.tick_style.font_size / self.label_style.font_size;
        self.title_style = self.title_style.font_family(family).font_size(base_size);
        self.label_style = self.label_style.font_family(family).font_size(base_size);
        self.tick_style = self
            .tick_style
            .font_family(family)
            .font_size((base_size * tick_ratio).round());
        self
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_font_scales_ticks() {
        let theme = Theme::Default.config().with_font("sans-serif", 20.0);
        assert_eq!(theme.label_style.font_size, 20.0);
        assert_eq!(theme.label_style.font_family, "sans-serif");
        assert!(theme.tick_style.font_size < 20.0);
    }
}

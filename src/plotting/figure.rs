//! Figure (canvas) implementation.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::plotting::axes::Axes;
use crate::plotting::backend::SvgBackend;
use crate::plotting::element::Bounds;
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::style::{Color, TextAnchor, ThemeConfig};

/// Normalized region shared by newly created axes before `tight_layout`.
const DEFAULT_FRAME: Bounds = Bounds {
    x_min: 0.12,
    x_max: 0.95,
    y_min: 0.11,
    y_max: 0.92,
};

/// A figure containing one or more axes (subplots).
#[derive(Debug)]
pub struct Figure {
    /// Figure width in pixels
    pub width: f64,
    /// Figure height in pixels
    pub height: f64,
    pub background: Color,
    /// Axes (subplots) in creation order
    axes: Vec<Axes>,
    pub theme: ThemeConfig,
    /// Figure title
    pub title: Option<String>,
}

impl Figure {
    /// Create a new figure with the given dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        let theme = ThemeConfig::default();
        Figure {
            width,
            height,
            background: theme.background.clone(),
            axes: Vec::new(),
            theme,
            title: None,
        }
    }

    /// Set the theme; applies to existing and future axes.
    pub fn theme(mut self, theme: ThemeConfig) -> Self {
        self.background = theme.background.clone();
        for ax in &mut self.axes {
            ax.apply_theme(theme.clone());
        }
        self.theme = theme;
        self
    }

    /// Set the figure title.
    pub fn suptitle(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn new_axes(&self, position: Bounds) -> Axes {
        let mut axes = Axes::new();
        axes.apply_theme(self.theme.clone());
        axes.position = position;
        axes
    }

    /// Add a subplot at the given position.
    /// Uses matplotlib-style indexing: (rows, cols, index) where index is 1-based.
    pub fn add_subplot(&mut self, rows: usize, cols: usize, index: usize) -> &mut Axes {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let index = index.saturating_sub(1);
        let row = index / cols;
        let col = index % cols;

        let cell_w = DEFAULT_FRAME.width() / cols as f64;
        let cell_h = DEFAULT_FRAME.height() / rows as f64;
        let left = DEFAULT_FRAME.x_min + col as f64 * cell_w;
        let top = DEFAULT_FRAME.y_max - row as f64 * cell_h;
        // Leave a gutter between neighbouring cells
        let position = Bounds::new(
            left,
            left + cell_w * if cols > 1 { 0.85 } else { 1.0 },
            top - cell_h * if rows > 1 { 0.85 } else { 1.0 },
            top,
        );

        let axes = self.new_axes(position);
        let idx = self.axes.len();
        self.axes.push(axes);
        &mut self.axes[idx]
    }

    /// Stack panels vertically, top to bottom, sharing one column.
    ///
    /// Heights follow `height_ratios`; `hspace` is the gap between panels as a
    /// fraction of the mean panel height. Returns the new axes, topmost first.
    pub fn stacked_panels(&mut self, height_ratios: &[f64], hspace: f64) -> PlotResult<&mut [Axes]> {
        if height_ratios.is_empty() {
            return Err(PlotError::UnsupportedLayout("no panels requested".to_string()));
        }
        if let Some(bad) = height_ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(PlotError::UnsupportedLayout(format!(
                "panel height ratio must be positive, got {}",
                bad
            )));
        }
        if !hspace.is_finite() || hspace < 0.0 {
            return Err(PlotError::UnsupportedLayout(format!(
                "panel spacing must be non-negative, got {}",
                hspace
            )));
        }

        let n = height_ratios.len() as f64;
        let total: f64 = height_ratios.iter().sum();
        let mean_h = DEFAULT_FRAME.height() / (n + hspace * (n - 1.0));
        let gap = hspace * mean_h;

        let start = self.axes.len();
        let mut top = DEFAULT_FRAME.y_max;
        for ratio in height_ratios {
            let h = ratio / total * mean_h * n;
            let position = Bounds::new(DEFAULT_FRAME.x_min, DEFAULT_FRAME.x_max, top - h, top);
            let axes = self.new_axes(position);
            self.axes.push(axes);
            top -= h + gap;
        }
        Ok(&mut self.axes[start..])
    }

    pub fn get_axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn get_axes_mut(&mut self) -> &mut [Axes] {
        &mut self.axes
    }

    /// Fit the axes block to the room needed by titles, labels and tick labels.
    pub fn tight_layout(&mut self) {
        if self.axes.is_empty() {
            return;
        }
        let pad = 0.6 * self.theme.tick_style.font_size;

        let left_px = self
            .axes
            .iter()
            .map(|ax| {
                ax.y_axis_depth() + ax.y_label.as_ref().map_or(0.0, |l| 1.3 * l.style.font_size)
            })
            .fold(0.0, f64::max)
            + pad;
        // Half of the last x tick label overhangs the frame
        let right_px = pad + 1.5 * self.theme.tick_style.font_size;

        let lowest = self
            .axes
            .iter()
            .min_by(|a, b| a.position.y_min.total_cmp(&b.position.y_min));
        let bottom_px = lowest.map_or(0.0, |ax| {
            ax.x_axis_depth() + ax.x_label.as_ref().map_or(0.0, |l| 1.3 * l.style.font_size)
        }) + pad;

        let highest = self
            .axes
            .iter()
            .max_by(|a, b| a.position.y_max.total_cmp(&b.position.y_max));
        let mut top_px = pad + highest.map_or(0.0, |ax| {
            ax.title.as_ref().map_or(0.0, |t| 1.5 * t.style.font_size)
        });
        if self.title.is_some() {
            top_px += 1.8 * self.theme.title_style.font_size;
        }

        let target = Bounds::new(
            left_px / self.width,
            1.0 - right_px / self.width,
            bottom_px / self.height,
            1.0 - top_px / self.height,
        );
        if target.width() <= 0.0 || target.height() <= 0.0 {
            log::warn!("figure too small for its labels, keeping the default layout");
            return;
        }

        let mut current = Bounds::empty();
        for ax in &self.axes {
            current.include_bounds(&ax.position);
        }
        let remap_x = |v: f64| target.x_min + (v - current.x_min) / current.width() * target.width();
        let remap_y = |v: f64| target.y_min + (v - current.y_min) / current.height() * target.height();
        for ax in &mut self.axes {
            let p = ax.position;
            ax.position = Bounds::new(remap_x(p.x_min), remap_x(p.x_max), remap_y(p.y_min), remap_y(p.y_max));
        }
    }

    /// Render the figure to an SVG string.
    pub fn render(&mut self) -> PlotResult<String> {
        let mut backend = SvgBackend::new(self.width, self.height);
        backend.fill_background(&self.background);

        if let Some(ref title) = self.title {
            let style = self.theme.title_style.clone().anchor(TextAnchor::Middle);
            backend.draw_text(self.width / 2.0, 1.3 * style.font_size, title, &style);
        }

        for (i, axes) in self.axes.iter_mut().enumerate() {
            axes.render(&mut backend, self.width, self.height, &format!("axes-clip-{}", i))?;
        }

        Ok(backend.render())
    }

    /// Save the figure to a file.
    pub fn save(&mut self, path: impl AsRef<Path>) -> PlotResult<()> {
        let svg = self.render()?;
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacked_panels_ratio_and_gap() {
        let mut fig = Figure::new(640.0, 480.0);
        let panels = fig.stacked_panels(&[3.0, 1.0], 0.0).unwrap();
        assert_eq!(panels.len(), 2);

        let (main, ratio) = (panels[0].position, panels[1].position);
        assert!((main.height() / ratio.height() - 3.0).abs() < 1e-9);
        // No gap: the ratio panel starts where the main panel ends
        assert!((main.y_min - ratio.y_max).abs() < 1e-12);
    }

    #[test]
    fn test_stacked_panels_rejects_bad_ratios() {
        let mut fig = Figure::new(640.0, 480.0);
        assert!(fig.stacked_panels(&[], 0.0).is_err());
        assert!(fig.stacked_panels(&[3.0, 0.0], 0.0).is_err());
        assert!(fig.stacked_panels(&[3.0, f64::NAN], 0.0).is_err());
        assert!(fig.get_axes().is_empty());
    }

    #[test]
    fn test_tight_layout_keeps_panels_inside() {
        let mut fig = Figure::new(640.0, 480.0).suptitle("title");
        fig.stacked_panels(&[3.0, 1.0], 0.0).unwrap();
        fig.get_axes_mut()[1].set_xlabel("x");
        fig.tight_layout();
        for ax in fig.get_axes() {
            let p = ax.position;
            assert!(p.x_min > 0.0 && p.x_max < 1.0 && p.y_min > 0.0 && p.y_max < 1.0);
        }
        let svg = fig.render().unwrap();
        assert!(svg.contains(">title</text>"));
    }
}

//! Axes (subplot) implementation.

use crate::plotting::backend::SvgBackend;
use crate::plotting::data::IntoPlotData;
use crate::plotting::element::{
    AxisConfig, Bounds, GridConfig, Legend, LegendPosition, Text, Transform,
};
use crate::plotting::error::PlotResult;
use crate::plotting::plot::{
    ErrorBars, FillBetween, HLine, LinePlot, Plot, PlotKind, ScatterPlot, StepPlot,
};
use crate::plotting::scale::{Scale, ScaleKind};
use crate::plotting::style::{
    Color, DashPattern, FillStyle, LineStyle, Marker, TextAnchor, ThemeConfig,
};

/// An axes object representing a single plot area.
#[derive(Debug)]
pub struct Axes {
    /// Position within figure (normalized coordinates, y up)
    pub position: Bounds,
    pub x_scale: Box<dyn Scale>,
    pub y_scale: Box<dyn Scale>,
    /// Plots in drawing order
    plots: Vec<Box<dyn Plot>>,
    pub title: Option<Text>,
    pub x_label: Option<Text>,
    pub y_label: Option<Text>,
    pub legend: Option<Legend>,
    pub grid: GridConfig,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    /// Union of the plot bounds
    data_bounds: Option<Bounds>,
    x_lim: Option<(f64, f64)>,
    y_lim: Option<(f64, f64)>,
    pub theme: ThemeConfig,
}

impl Axes {
    /// Create a new axes with default settings.
    pub fn new() -> Self {
        let mut axes = Axes {
            position: Bounds::new(0.1, 0.9, 0.1, 0.9),
            x_scale: ScaleKind::Linear.build(),
            y_scale: ScaleKind::Linear.build(),
            plots: Vec::new(),
            title: None,
            x_label: None,
            y_label: None,
            legend: None,
            grid: GridConfig::default(),
            x_axis: AxisConfig::default(),
            y_axis: AxisConfig::default(),
            data_bounds: None,
            x_lim: None,
            y_lim: None,
            theme: ThemeConfig::default(),
        };
        axes.apply_theme(ThemeConfig::default());
        axes
    }

    /// Restyle frame, ticks and grid from a theme.
    pub fn apply_theme(&mut self, theme: ThemeConfig) {
        for axis in [&mut self.x_axis, &mut self.y_axis] {
            axis.line_style = LineStyle::new()
                .color(theme.axis_color.clone())
                .width(theme.axis_width);
            axis.tick_label_style = theme.tick_style.clone();
        }
        self.grid = GridConfig {
            visible: theme.show_grid,
            ..GridConfig::default()
        }
        .color(theme.grid_color.clone(), theme.grid_opacity);
        self.theme = theme;
    }

    /// Add a line through the points.
    pub fn plot(&mut self, x: impl IntoPlotData, y: impl IntoPlotData) -> PlotBuilder<'_, LinePlot> {
        let plot = LinePlot::new(x.into_plot_data(), y.into_plot_data());
        PlotBuilder { axes: self, plot }
    }

    /// Add a post-step staircase through the vertices.
    pub fn step(&mut self, x: impl IntoPlotData, y: impl IntoPlotData) -> PlotBuilder<'_, StepPlot> {
        let plot = StepPlot::new(x.into_plot_data(), y.into_plot_data());
        PlotBuilder { axes: self, plot }
    }

    /// Add unconnected markers.
    pub fn scatter(
        &mut self,
        x: impl IntoPlotData,
        y: impl IntoPlotData,
    ) -> PlotBuilder<'_, ScatterPlot> {
        let plot = ScatterPlot::new(x.into_plot_data(), y.into_plot_data());
        PlotBuilder { axes: self, plot }
    }

    /// Add error bars around the points; attach extents with `xerr`/`yerr`.
    pub fn errorbar(
        &mut self,
        x: impl IntoPlotData,
        y: impl IntoPlotData,
    ) -> PlotBuilder<'_, ErrorBars> {
        let plot = ErrorBars::new(x.into_plot_data(), y.into_plot_data());
        PlotBuilder { axes: self, plot }
    }

    /// Shade the area between two curves.
    pub fn fill_between(
        &mut self,
        x: impl IntoPlotData,
        y1: impl IntoPlotData,
        y2: impl IntoPlotData,
    ) -> PlotBuilder<'_, FillBetween> {
        let plot = FillBetween::new(x.into_plot_data(), y1.into_plot_data(), y2.into_plot_data());
        PlotBuilder { axes: self, plot }
    }

    /// Draw a horizontal line across the whole axes.
    pub fn axhline(&mut self, y: f64, style: LineStyle) -> &mut Self {
        self.add_plot(Box::new(HLine::new(y, style)));
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(Text::new(title, self.theme.title_style.clone()));
        self
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.x_label = Some(Text::new(label, self.theme.label_style.clone()));
        self
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.y_label = Some(Text::new(label, self.theme.label_style.clone()));
        self
    }

    pub fn set_xlim(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_lim = Some((min, max));
        self
    }

    pub fn set_ylim(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_lim = Some((min, max));
        self
    }

    pub fn xlim(&self) -> Option<(f64, f64)> {
        self.x_lim
    }

    pub fn ylim(&self) -> Option<(f64, f64)> {
        self.y_lim
    }

    pub fn set_xscale(&mut self, kind: ScaleKind) -> &mut Self {
        self.x_scale = kind.build();
        self
    }

    pub fn set_yscale(&mut self, kind: ScaleKind) -> &mut Self {
        self.y_scale = kind.build();
        self
    }

    /// Keep the x ticks but drop their value labels.
    pub fn hide_x_tick_labels(&mut self) -> &mut Self {
        self.x_axis.show_tick_labels = false;
        self
    }

    /// Cap the number of y ticks.
    pub fn set_max_yticks(&mut self, n: usize) -> &mut Self {
        self.y_axis.num_ticks = n;
        self
    }

    /// Show the legend at a position with the given label font size.
    pub fn legend_at(&mut self, position: LegendPosition, font_size: f64) -> &mut Self {
        let legend = self.legend.get_or_insert_with(Legend::new);
        legend.visible = true;
        legend.position = position;
        legend.text_style = self
            .theme
            .tick_style
            .clone()
            .font_size(font_size)
            .anchor(TextAnchor::Start);
        self
    }

    /// Number of plots added so far.
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    /// Kinds of the plots in drawing order.
    pub fn plot_kinds(&self) -> Vec<PlotKind> {
        self.plots.iter().map(|p| p.kind()).collect()
    }

    /// Add a plot to this axes.
    pub(crate) fn add_plot(&mut self, plot: Box<dyn Plot>) {
        if let Some(plot_bounds) = plot.bounds() {
            match self.data_bounds {
                Some(ref mut bounds) => bounds.include_bounds(&plot_bounds),
                None => self.data_bounds = Some(plot_bounds),
            }
        }

        if let Some(entry) = plot.legend_entry() {
            self.legend
                .get_or_insert_with(|| Legend::new().visible(false))
                .add_entry(entry);
        }

        self.plots.push(plot);
    }

    /// Effective range along one axis: explicit limits win, otherwise padded data bounds.
    fn resolve_range(lim: Option<(f64, f64)>, data: Option<(f64, f64)>, kind: ScaleKind) -> (f64, f64) {
        if let Some(range) = lim {
            return range;
        }
        let Some((lo, hi)) = data else {
            return match kind {
                ScaleKind::Linear => (0.0, 1.0),
                ScaleKind::Log => (1.0, 10.0),
            };
        };
        match kind {
            ScaleKind::Linear => {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
            ScaleKind::Log => (lo * 0.9, hi * 1.1),
        }
    }

    /// Pixel rectangle of the plot area inside a figure.
    pub fn pixel_bounds(&self, figure_width: f64, figure_height: f64) -> Bounds {
        Bounds::new(
            self.position.x_min * figure_width,
            self.position.x_max * figure_width,
            (1.0 - self.position.y_max) * figure_height,
            (1.0 - self.position.y_min) * figure_height,
        )
    }

    /// Render the axes into the figure backend.
    pub fn render(
        &mut self,
        svg: &mut SvgBackend,
        figure_width: f64,
        figure_height: f64,
        clip_id: &str,
    ) -> PlotResult<()> {
        let pixel = self.pixel_bounds(figure_width, figure_height);

        let (x_min, x_max) = Self::resolve_range(
            self.x_lim,
            self.data_bounds.map(|b| (b.x_min, b.x_max)),
            self.x_scale.kind(),
        );
        let (y_min, y_max) = Self::resolve_range(
            self.y_lim,
            self.data_bounds.map(|b| (b.y_min, b.y_max)),
            self.y_scale.kind(),
        );
        self.x_scale.set_range(x_min, x_max)?;
        self.y_scale.set_range(y_min, y_max)?;

        svg.draw_rect(
            pixel.x_min,
            pixel.y_min,
            pixel.width(),
            pixel.height(),
            &FillStyle::new(self.theme.plot_background.clone()),
        );

        self.grid.render(
            svg,
            (self.x_scale.as_ref(), self.x_axis.num_ticks),
            (self.y_scale.as_ref(), self.y_axis.num_ticks),
            &pixel,
        );

        let transform = Transform::new(self.x_scale.as_ref(), self.y_scale.as_ref(), pixel);
        svg.start_clip(clip_id, pixel.x_min, pixel.y_min, pixel.width(), pixel.height());
        for plot in &self.plots {
            plot.render(svg, &transform);
        }
        svg.end_clip();

        self.x_axis.render_x(svg, self.x_scale.as_ref(), &pixel);
        self.y_axis.render_y(svg, self.y_scale.as_ref(), &pixel);
        self.render_labels(svg, &pixel);

        if let Some(ref legend) = self.legend {
            legend.render(svg, &pixel);
        }
        Ok(())
    }

    fn render_labels(&self, svg: &mut SvgBackend, pixel: &Bounds) {
        let cx = (pixel.x_min + pixel.x_max) / 2.0;
        let cy = (pixel.y_min + pixel.y_max) / 2.0;

        if let Some(ref title) = self.title {
            let style = title.style.clone().anchor(TextAnchor::Middle);
            svg.draw_text(cx, pixel.y_min - 0.5 * style.font_size, &title.content, &style);
        }

        if let Some(ref label) = self.x_label {
            let style = label.style.clone().anchor(TextAnchor::Middle);
            let y = pixel.y_max + self.x_axis_depth() + style.font_size;
            svg.draw_text(cx, y, &label.content, &style);
        }

        if let Some(ref label) = self.y_label {
            let style = label.style.clone().anchor(TextAnchor::Middle).rotation(-90.0);
            let x = pixel.x_min - self.y_axis_depth() - 0.4 * style.font_size;
            svg.draw_text(x, cy, &label.content, &style);
        }
    }

    /// Vertical room taken below the frame by ticks and tick labels.
    pub(crate) fn x_axis_depth(&self) -> f64 {
        let labels = if self.x_axis.show_tick_labels {
            self.x_axis.tick_label_style.font_size + self.x_axis.tick_padding
        } else {
            0.0
        };
        self.x_axis.tick_length + labels + 4.0
    }

    /// Horizontal room taken left of the frame by ticks and tick labels.
    pub(crate) fn y_axis_depth(&self) -> f64 {
        // Up to five characters per tick label
        let labels = 5.0 * 0.6 * self.y_axis.tick_label_style.font_size + self.y_axis.tick_padding;
        self.y_axis.tick_length + labels
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder returned by the `Axes` drawing methods; `build` adds the plot.
pub struct PlotBuilder<'a, P: Plot + 'static> {
    axes: &'a mut Axes,
    plot: P,
}

impl<'a, P: Plot + 'static> PlotBuilder<'a, P> {
    pub fn build(self) -> &'a mut Axes {
        self.axes.add_plot(Box::new(self.plot));
        self.axes
    }
}

impl<'a> PlotBuilder<'a, LinePlot> {
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.plot = self.plot.color(color);
        self
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.plot = self.plot.linewidth(width);
        self
    }

    pub fn linestyle(mut self, dash: DashPattern) -> Self {
        self.plot = self.plot.linestyle(dash);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.plot = self.plot.label(label);
        self
    }
}

impl<'a> PlotBuilder<'a, StepPlot> {
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.plot = self.plot.color(color);
        self
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.plot = self.plot.linewidth(width);
        self
    }

    pub fn linestyle(mut self, dash: DashPattern) -> Self {
        self.plot = self.plot.linestyle(dash);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.plot = self.plot.label(label);
        self
    }
}

impl<'a> PlotBuilder<'a, ScatterPlot> {
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.plot = self.plot.color(color);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.plot = self.plot.marker(marker);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.plot = self.plot.size(size);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.plot = self.plot.label(label);
        self
    }
}

impl<'a> PlotBuilder<'a, ErrorBars> {
    pub fn xerr(mut self, minus: impl IntoPlotData, plus: impl IntoPlotData) -> Self {
        self.plot = self.plot.xerr(minus.into_plot_data(), plus.into_plot_data());
        self
    }

    pub fn yerr(mut self, minus: impl IntoPlotData, plus: impl IntoPlotData) -> Self {
        self.plot = self.plot.yerr(minus.into_plot_data(), plus.into_plot_data());
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.plot = self.plot.color(color);
        self
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.plot = self.plot.linewidth(width);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.plot = self.plot.label(label);
        self
    }
}

impl<'a> PlotBuilder<'a, FillBetween> {
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.plot = self.plot.color(color);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.plot = self.plot.label(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoscale_pads_linear_range() {
        let range = Axes::resolve_range(None, Some((0.0, 10.0)), ScaleKind::Linear);
        assert_eq!(range, (-0.5, 10.5));
        let fixed = Axes::resolve_range(Some((1.0, 2.0)), Some((0.0, 10.0)), ScaleKind::Linear);
        assert_eq!(fixed, (1.0, 2.0));
    }

    #[test]
    fn test_labelled_plots_feed_hidden_legend() {
        let mut ax = Axes::new();
        ax.plot(vec![0.0, 1.0], vec![1.0, 2.0]).label("a").build();
        ax.step(vec![0.0, 1.0], vec![1.0, 2.0]).build();
        assert_eq!(ax.plot_count(), 2);

        let legend = ax.legend.as_ref().unwrap();
        assert_eq!(legend.entries.len(), 1);
        assert!(!legend.visible);

        ax.legend_at(LegendPosition::TopLeft, 8.0);
        assert!(ax.legend.as_ref().unwrap().visible);
    }

    #[test]
    fn test_log_axis_rejects_non_positive_limits() {
        let mut ax = Axes::new();
        ax.set_yscale(ScaleKind::Log).set_ylim(0.0, 10.0);
        let mut svg = SvgBackend::new(100.0, 100.0);
        assert!(ax.render(&mut svg, 100.0, 100.0, "clip").is_err());
    }

    #[test]
    fn test_title_and_labels_render() {
        let mut ax = Axes::new();
        ax.set_title("Panel <a>").set_xlabel("x").set_ylabel("y");
        ax.plot(vec![0.0, 1.0], vec![0.0, 1.0]).build();
        let mut svg = SvgBackend::new(200.0, 200.0);
        ax.render(&mut svg, 200.0, 200.0, "clip").unwrap();
        let out = svg.render();
        assert!(out.contains("Panel &lt;a&gt;"));
    }
}

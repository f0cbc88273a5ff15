//! Error bars drawn as crosses around each point.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{Plot, PlotKind};
use crate::plotting::style::{Color, LineStyle};

/// Asymmetric error bars: `(minus, plus)` distances from each point.
#[derive(Debug, Clone)]
pub struct ErrorBars {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub xerr: Option<(Vec<f64>, Vec<f64>)>,
    pub yerr: Option<(Vec<f64>, Vec<f64>)>,
    pub line_style: LineStyle,
    pub label: Option<String>,
}

impl ErrorBars {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        ErrorBars {
            x,
            y,
            xerr: None,
            yerr: None,
            line_style: LineStyle::default(),
            label: None,
        }
    }

    pub fn xerr(mut self, minus: Vec<f64>, plus: Vec<f64>) -> Self {
        self.xerr = Some((minus, plus));
        self
    }

    pub fn yerr(mut self, minus: Vec<f64>, plus: Vec<f64>) -> Self {
        self.yerr = Some((minus, plus));
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.line_style.color = color.into();
        self
    }

    pub fn linewidth(mut self, width: f64) -> Self {
        self.line_style.width = width;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Extent of bar `i` along one axis.
    fn span(err: &Option<(Vec<f64>, Vec<f64>)>, i: usize, centre: f64) -> Option<(f64, f64)> {
        let (minus, plus) = err.as_ref()?;
        Some((centre - minus.get(i)?, centre + plus.get(i)?))
    }
}

impl Plot for ErrorBars {
    fn bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::empty();
        for (i, (&x, &y)) in self.x.iter().zip(self.y.iter()).enumerate() {
            bounds.include_point(x, y);
            if let Some((lo, hi)) = Self::span(&self.xerr, i, x) {
                bounds.include_point(lo, y);
                bounds.include_point(hi, y);
            }
            if let Some((lo, hi)) = Self::span(&self.yerr, i, y) {
                bounds.include_point(x, lo);
                bounds.include_point(x, hi);
            }
        }
        bounds.is_valid().then_some(bounds)
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn line_style(&self) -> Option<LineStyle> {
        Some(self.line_style.clone())
    }

    fn kind(&self) -> PlotKind {
        PlotKind::ErrorBars
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        for (i, (&x, &y)) in self.x.iter().zip(self.y.iter()).enumerate() {
            if let Some((lo, hi)) = Self::span(&self.xerr, i, x)
                && let (Some((x1, py)), Some((x2, _))) = (transform.point(lo, y), transform.point(hi, y))
            {
                svg.draw_line(x1, py, x2, py, &self.line_style);
            }
            if let Some((lo, hi)) = Self::span(&self.yerr, i, y)
                && let (Some((px, y1)), Some((_, y2))) = (transform.point(x, lo), transform.point(x, hi))
            {
                svg.draw_line(px, y1, px, y2, &self.line_style);
            }
        }
    }
}

//! Filled band between two curves.

use crate::plotting::backend::SvgBackend;
use crate::plotting::element::{Bounds, Transform};
use crate::plotting::plot::{Plot, PlotKind};
use crate::plotting::style::{Color, FillStyle};

/// Area between `y1` and `y2` over a shared `x`.
#[derive(Debug, Clone)]
pub struct FillBetween {
    pub x: Vec<f64>,
    pub y1: Vec<f64>,
    pub y2: Vec<f64>,
    pub fill_style: FillStyle,
    pub label: Option<String>,
}

impl FillBetween {
    pub fn new(x: Vec<f64>, y1: Vec<f64>, y2: Vec<f64>) -> Self {
        FillBetween {
            x,
            y1,
            y2,
            fill_style: FillStyle::default(),
            label: None,
        }
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.fill_style.color = color.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Polygons covering each run of indices where all three values are drawable.
    fn polygons(&self, transform: &Transform) -> Vec<Vec<(f64, f64)>> {
        let mut polygons = Vec::new();
        let mut upper: Vec<(f64, f64)> = Vec::new();
        let mut lower: Vec<(f64, f64)> = Vec::new();

        let mut flush = |upper: &mut Vec<(f64, f64)>, lower: &mut Vec<(f64, f64)>| {
            if upper.len() >= 2 {
                let mut poly = std::mem::take(upper);
                poly.extend(lower.drain(..).rev());
                polygons.push(poly);
            }
            upper.clear();
            lower.clear();
        };

        for ((&x, &a), &b) in self.x.iter().zip(self.y1.iter()).zip(self.y2.iter()) {
            match (transform.point(x, a), transform.point(x, b)) {
                (Some(pa), Some(pb)) => {
                    upper.push(pa);
                    lower.push(pb);
                }
                _ => flush(&mut upper, &mut lower),
            }
        }
        flush(&mut upper, &mut lower);
        polygons
    }
}

impl Plot for FillBetween {
    fn bounds(&self) -> Option<Bounds> {
        let points = self
            .x
            .iter()
            .zip(self.y1.iter().zip(self.y2.iter()))
            .flat_map(|(&x, (&a, &b))| [(x, a), (x, b)]);
        Bounds::of_points(points)
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn fill_style(&self) -> Option<FillStyle> {
        Some(self.fill_style.clone())
    }

    fn kind(&self) -> PlotKind {
        PlotKind::Fill
    }

    fn render(&self, svg: &mut SvgBackend, transform: &Transform) {
        for polygon in self.polygons(transform) {
            svg.draw_polygon(&polygon, &self.fill_style);
        }
    }
}

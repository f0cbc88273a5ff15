//! Visual elements for plots.

mod axis;
mod grid;
mod legend;
pub mod text;

pub use axis::AxisConfig;
pub use grid::GridConfig;
pub use legend::{Legend, LegendEntry, LegendPosition};
pub use text::{escape_xml, Text};

use crate::plotting::scale::Scale;

/// Bounding box for elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Create a new bounds with the given values.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// An inverted box that any included point will replace.
    pub fn empty() -> Self {
        Bounds::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// Create a unit bounds (0 to 1).
    pub fn unit() -> Self {
        Bounds::new(0.0, 1.0, 0.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Expand bounds to include a point. Non-finite coordinates are ignored.
    pub fn include_point(&mut self, x: f64, y: f64) {
        if x.is_finite() {
            self.x_min = self.x_min.min(x);
            self.x_max = self.x_max.max(x);
        }
        if y.is_finite() {
            self.y_min = self.y_min.min(y);
            self.y_max = self.y_max.max(y);
        }
    }

    /// Expand bounds to include another bounds.
    pub fn include_bounds(&mut self, other: &Bounds) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    /// Add padding as a fraction of the range.
    pub fn pad(&self, fraction: f64) -> Bounds {
        let x_pad = self.width() * fraction;
        let y_pad = self.height() * fraction;
        Bounds {
            x_min: self.x_min - x_pad,
            x_max: self.x_max + x_pad,
            y_min: self.y_min - y_pad,
            y_max: self.y_max + y_pad,
        }
    }

    /// Whether both axes saw at least one finite value.
    pub fn is_valid(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
    }

    /// Bounds of a point cloud, `None` when no point is finite.
    pub fn of_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Bounds> {
        let mut bounds = Bounds::empty();
        for (x, y) in points {
            bounds.include_point(x, y);
        }
        bounds.is_valid().then_some(bounds)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::unit()
    }
}

/// Maps data coordinates to pixel coordinates through the axes scales.
pub struct Transform<'a> {
    x_scale: &'a dyn Scale,
    y_scale: &'a dyn Scale,
    pixel: Bounds,
}

impl<'a> Transform<'a> {
    pub fn new(x_scale: &'a dyn Scale, y_scale: &'a dyn Scale, pixel: Bounds) -> Self {
        Transform {
            x_scale,
            y_scale,
            pixel,
        }
    }

    /// The pixel rectangle of the plot area.
    pub fn pixel_bounds(&self) -> &Bounds {
        &self.pixel
    }

    pub fn x(&self, x: f64) -> f64 {
        self.pixel.x_min + self.x_scale.transform(x) * self.pixel.width()
    }

    // SVG y grows downward
    pub fn y(&self, y: f64) -> f64 {
        self.pixel.y_max - self.y_scale.transform(y) * self.pixel.height()
    }

    /// Transform a point, `None` when either coordinate is not drawable.
    pub fn point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (px, py) = (self.x(x), self.y(y));
        (px.is_finite() && py.is_finite()).then_some((px, py))
    }
}

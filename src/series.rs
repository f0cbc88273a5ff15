//! Canonical 1-D series built from binned data objects.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// One point of a 1-D series with asymmetric errors, at source precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub exminus: f64,
    pub explus: f64,
    pub y: f64,
    pub eyminus: f64,
    pub eyplus: f64,
}

impl Point {
    /// A bin `[low, high)` with value and asymmetric value errors.
    pub fn from_bin(low: f64, high: f64, value: f64, err_minus: f64, err_plus: f64) -> Self {
        let centre = 0.5 * (low + high);
        Point {
            x: centre,
            exminus: centre - low,
            explus: high - centre,
            y: value,
            eyminus: err_minus,
            eyplus: err_plus,
        }
    }
}

/// A binned data object as produced by a reader.
pub trait BinnedSource {
    /// Unique object path, e.g. `/REF/h_pt`
    fn path(&self) -> &str;

    /// Object kind as named by the data file, e.g. `HISTOGRAM`
    fn kind(&self) -> &str;

    fn annotation(&self, key: &str) -> Option<&str>;

    /// All annotations in file order.
    fn annotations(&self) -> Vec<(String, String)>;

    /// The object as 1-D points, `None` when it has no such view.
    fn points(&self) -> Option<Vec<Point>>;
}

/// Read access shared by everything that styles, measures or draws a series.
pub trait AnnotatedSeries {
    fn path(&self) -> &str;

    fn annotation(&self, key: &str) -> Option<&str>;

    /// Annotation value, or `default` when absent.
    fn annotation_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.annotation(key).unwrap_or(default)
    }

    fn x(&self) -> &[f32];
    fn exminus(&self) -> &[f32];
    fn explus(&self) -> &[f32];
    fn y(&self) -> &[f32];
    fn eyminus(&self) -> &[f32];
    fn eyplus(&self) -> &[f32];

    /// Number of points.
    fn len(&self) -> usize {
        self.x().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bin low edges.
    fn xmin(&self) -> Vec<f32> {
        self.x().iter().zip(self.exminus()).map(|(x, e)| x - e).collect()
    }

    /// Bin high edges.
    fn xmax(&self) -> Vec<f32> {
        self.x().iter().zip(self.explus()).map(|(x, e)| x + e).collect()
    }

    fn ymin(&self) -> Vec<f32> {
        self.y().iter().zip(self.eyminus()).map(|(y, e)| y - e).collect()
    }

    fn ymax(&self) -> Vec<f32> {
        self.y().iter().zip(self.eyplus()).map(|(y, e)| y + e).collect()
    }

    /// Display title for the legend, if set and non-empty.
    fn title(&self) -> Option<&str> {
        self.annotation("Title").filter(|t| !t.trim().is_empty())
    }
}

/// A series reduced to parallel single-precision arrays plus annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    path: String,
    annotations: IndexMap<String, String>,
    x: Vec<f32>,
    exminus: Vec<f32>,
    explus: Vec<f32>,
    y: Vec<f32>,
    eyminus: Vec<f32>,
    eyplus: Vec<f32>,
}

impl Series {
    /// Build from points; values are narrowed to `f32`.
    pub fn new(path: impl Into<String>, points: &[Point]) -> Self {
        let column = |f: fn(&Point) -> f64| points.iter().map(|p| f(p) as f32).collect();
        Series {
            path: path.into(),
            annotations: IndexMap::new(),
            x: column(|p| p.x),
            exminus: column(|p| p.exminus),
            explus: column(|p| p.explus),
            y: column(|p| p.y),
            eyminus: column(|p| p.eyminus),
            eyplus: column(|p| p.eyplus),
        }
    }

    /// Convenience constructor from bin edges (`N + 1`) and values (`N`), no errors.
    pub fn from_edges(path: impl Into<String>, edges: &[f64], values: &[f64]) -> Self {
        let points: Vec<Point> = edges
            .windows(2)
            .zip(values)
            .map(|(w, &v)| Point::from_bin(w[0], w[1], v, 0.0, 0.0))
            .collect();
        Series::new(path, &points)
    }

    /// Convert a data object, failing for objects without a 1-D point view.
    pub fn from_source(source: &dyn BinnedSource) -> Result<Self> {
        let points = source.points().ok_or_else(|| Error::InvalidSourceKind {
            path: source.path().to_string(),
            kind: source.kind().to_string(),
        })?;
        let mut series = Series::new(source.path(), &points);
        series.annotations = source.annotations().into_iter().collect();
        Ok(series)
    }

    /// Attach or replace an annotation.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

impl AnnotatedSeries for Series {
    fn path(&self) -> &str {
        &self.path
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    fn x(&self) -> &[f32] {
        &self.x
    }

    fn exminus(&self) -> &[f32] {
        &self.exminus
    }

    fn explus(&self) -> &[f32] {
        &self.explus
    }

    fn y(&self) -> &[f32] {
        &self.y
    }

    fn eyminus(&self) -> &[f32] {
        &self.eyminus
    }

    fn eyplus(&self) -> &[f32] {
        &self.eyplus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid;

    impl BinnedSource for Grid {
        fn path(&self) -> &str {
            "/h2"
        }
        fn kind(&self) -> &str {
            "HISTOGRAM2D"
        }
        fn annotation(&self, _key: &str) -> Option<&str> {
            None
        }
        fn annotations(&self) -> Vec<(String, String)> {
            Vec::new()
        }
        fn points(&self) -> Option<Vec<Point>> {
            None
        }
    }

    #[test]
    fn test_derived_edges() {
        let s = Series::from_edges("/h", &[0.0, 1.0, 3.0], &[5.0, 6.0]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.x(), &[0.5, 2.0]);
        assert_eq!(s.xmin(), vec![0.0, 1.0]);
        assert_eq!(s.xmax(), vec![1.0, 3.0]);
        assert_eq!(s.ymin(), s.y());
    }

    #[test]
    fn test_from_source_rejects_non_1d() {
        let err = Series::from_source(&Grid).unwrap_err();
        assert!(matches!(err, Error::InvalidSourceKind { ref kind, .. } if kind == "HISTOGRAM2D"));
    }

    #[test]
    fn test_title_ignores_blank() {
        let s = Series::from_edges("/h", &[0.0, 1.0], &[1.0]).with_annotation("Title", "  ");
        assert_eq!(s.title(), None);
        let s = s.with_annotation("Title", "Data");
        assert_eq!(s.title(), Some("Data"));
        assert_eq!(s.annotation_or("Color", "red"), "red");
    }
}

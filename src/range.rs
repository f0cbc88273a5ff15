//! Axis range and scale resolution.

use crate::error::Result;
use crate::keys::PlotKeys;
use crate::plotting::ScaleKind;
use crate::series::AnnotatedSeries;

/// Which main-panel axis to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn min_key(self) -> &'static str {
        match self {
            Axis::X => "XMin",
            Axis::Y => "YMin",
        }
    }

    fn max_key(self) -> &'static str {
        match self {
            Axis::X => "XMax",
            Axis::Y => "YMax",
        }
    }

    fn log_key(self) -> &'static str {
        match self {
            Axis::X => "LogX",
            Axis::Y => "LogY",
        }
    }
}

/// Linear unless `key` parses true.
pub fn scale_for(keys: &PlotKeys, key: &str) -> Result<ScaleKind> {
    Ok(match keys.get_bool(key)? {
        Some(true) => ScaleKind::Log,
        _ => ScaleKind::Linear,
    })
}

/// Scale of a main-panel axis (`LogX` / `LogY`).
pub fn axis_scale(keys: &PlotKeys, axis: Axis) -> Result<ScaleKind> {
    scale_for(keys, axis.log_key())
}

/// Scale of the ratio panel's Y axis (`RatioLogY`).
pub fn ratio_scale(keys: &PlotKeys) -> Result<ScaleKind> {
    scale_for(keys, "RatioLogY")
}

/// Lower bound of a log axis with no positive data.
const LOG_FLOOR: f64 = 0.1;

fn finite_extent(values: impl IntoIterator<Item = f32>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .map(f64::from)
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn smallest_positive(values: impl IntoIterator<Item = f32>) -> Option<f64> {
    values
        .into_iter()
        .map(f64::from)
        .filter(|v| v.is_finite() && *v > 0.0)
        .reduce(f64::min)
}

/// Bounds of a main-panel axis.
///
/// Explicit `XMin`/`XMax`/`YMin`/`YMax` keys win. Otherwise the minimum and
/// maximum come from the lower and upper edges of all series; a computed
/// Y maximum is pushed up by `headroom` times its magnitude. On a log axis a
/// computed minimum that is not positive is replaced by the smallest positive
/// edge or central value, so every positive point stays visible.
pub fn resolve_axis<S: AnnotatedSeries>(
    keys: &PlotKeys,
    series: &[S],
    axis: Axis,
    headroom: f64,
) -> Result<(f64, f64)> {
    let per_series = |s: &S| -> [Vec<f32>; 3] {
        match axis {
            Axis::X => [s.xmin(), s.x().to_vec(), s.xmax()],
            Axis::Y => [s.ymin(), s.y().to_vec(), s.ymax()],
        }
    };
    let columns: Vec<[Vec<f32>; 3]> = series.iter().map(per_series).collect();
    let columns = columns.as_slice();
    let column = move |i: usize| columns.iter().flat_map(move |c| c[i].iter().copied());

    let data_min = finite_extent(column(0)).map(|(lo, _)| lo);
    let data_max = finite_extent(column(2)).map(|(_, hi)| hi);

    let min = match keys.get_f64(axis.min_key())? {
        Some(v) => v,
        None => {
            let min = data_min.unwrap_or(0.0);
            if min <= 0.0 && axis_scale(keys, axis)? == ScaleKind::Log {
                smallest_positive(column(0).chain(column(1)).chain(column(2))).unwrap_or(LOG_FLOOR)
            } else {
                min
            }
        }
    };
    let max = match keys.get_f64(axis.max_key())? {
        Some(v) => v,
        None => {
            let max = data_max.unwrap_or(1.0);
            if axis == Axis::Y { max + (headroom - 1.0) * max.abs() } else { max }
        }
    };
    Ok((min, max))
}

/// Bounds of the ratio panel's Y axis.
///
/// `RatioYMin`/`RatioYMax` win; otherwise the finite extent of `values`
/// (ratio curves and band), falling back to `[0.5, 1.5]` around unity.
pub fn resolve_ratio_axis(keys: &PlotKeys, values: &[f32]) -> Result<(f64, f64)> {
    let extent = finite_extent(values.iter().copied());
    let min = match keys.get_f64("RatioYMin")? {
        Some(v) => v,
        None => {
            let min = extent.map_or(0.5, |(lo, _)| lo);
            if min <= 0.0 && ratio_scale(keys)? == ScaleKind::Log {
                smallest_positive(values.iter().copied()).unwrap_or(LOG_FLOOR)
            } else {
                min
            }
        }
    };
    let max = match keys.get_f64("RatioYMax")? {
        Some(v) => v,
        None => extent.map_or(1.5, |(_, hi)| hi),
    };
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::series::{Point, Series};

    fn data() -> Vec<Series> {
        vec![
            Series::new("/a", &[Point::from_bin(0.0, 1.0, 2.0, 1.0, 1.0)]),
            Series::new("/b", &[Point::from_bin(1.0, 4.0, -1.0, 0.5, 0.5)]),
        ]
    }

    #[test]
    fn test_data_driven_bounds() {
        let keys = PlotKeys::new();
        assert_eq!(resolve_axis(&keys, &data(), Axis::X, 1.1).unwrap(), (0.0, 4.0));
        let (lo, hi) = resolve_axis(&keys, &data(), Axis::Y, 1.1).unwrap();
        assert_eq!(lo, -1.5);
        assert!((hi - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_overrides_skip_headroom() {
        let keys: PlotKeys = [("YMax", "10"), ("XMin", "-2")].into_iter().collect();
        assert_eq!(resolve_axis(&keys, &data(), Axis::Y, 1.1).unwrap().1, 10.0);
        assert_eq!(resolve_axis(&keys, &data(), Axis::X, 1.1).unwrap(), (-2.0, 4.0));
    }

    #[test]
    fn test_log_axis_uses_smallest_positive_edge() {
        let keys: PlotKeys = [("LogY", "yes")].into_iter().collect();
        let (lo, _) = resolve_axis(&keys, &data(), Axis::Y, 1.1).unwrap();
        assert_eq!(lo, 1.0);
        assert_eq!(axis_scale(&keys, Axis::Y).unwrap(), ScaleKind::Log);
        assert_eq!(axis_scale(&keys, Axis::X).unwrap(), ScaleKind::Linear);
    }

    #[test]
    fn test_log_axis_keeps_central_values_visible() {
        let keys: PlotKeys = [("LogY", "1")].into_iter().collect();
        let series = vec![Series::new(
            "/h",
            &[
                Point::from_bin(0.0, 1.0, 1.0, 1.0, 1.0),
                Point::from_bin(1.0, 2.0, 10.0, 1.0, 1.0),
            ],
        )];
        let (lo, hi) = resolve_axis(&keys, &series, Axis::Y, 1.1).unwrap();
        assert_eq!(lo, 1.0);
        assert!((hi - 12.1).abs() < 1e-6);

        let single = vec![Series::new("/h", &[Point::from_bin(0.0, 1.0, 1.0, 1.0, 1.0)])];
        let (lo, hi) = resolve_axis(&keys, &single, Axis::Y, 1.1).unwrap();
        assert_eq!(lo, 1.0);
        assert!(hi > lo);
    }

    #[test]
    fn test_log_axis_without_positive_data_gets_floor() {
        let keys: PlotKeys = [("LogY", "1")].into_iter().collect();
        let empty = vec![Series::new("/h", &[Point::from_bin(0.0, 1.0, 0.0, 0.0, 0.0)])];
        assert_eq!(resolve_axis(&keys, &empty, Axis::Y, 1.1).unwrap().0, LOG_FLOOR);

        let keys: PlotKeys = [("RatioLogY", "1")].into_iter().collect();
        assert_eq!(resolve_ratio_axis(&keys, &[0.0, -1.0]).unwrap().0, LOG_FLOOR);
        assert_eq!(resolve_ratio_axis(&keys, &[0.0, 0.25, 2.0]).unwrap(), (0.25, 2.0));
    }

    #[test]
    fn test_headroom_raises_negative_maximum() {
        let series = vec![Series::new("/h", &[Point::from_bin(0.0, 1.0, -2.0, 0.5, 1.0)])];
        let (lo, hi) = resolve_axis(&PlotKeys::new(), &series, Axis::Y, 1.1).unwrap();
        assert_eq!(lo, -2.5);
        assert!((hi - -0.9).abs() < 1e-6);
        assert!(hi > -1.0);
    }

    #[test]
    fn test_bad_values_are_errors() {
        let keys: PlotKeys = [("LogY", "sure")].into_iter().collect();
        assert!(matches!(axis_scale(&keys, Axis::Y), Err(Error::InvalidBooleanLiteral { .. })));
        let keys: PlotKeys = [("XMin", "left")].into_iter().collect();
        assert!(matches!(
            resolve_axis(&keys, &data(), Axis::X, 1.1),
            Err(Error::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_ratio_axis() {
        let keys = PlotKeys::new();
        let values = [0.8, f32::INFINITY, 1.3, f32::NAN];
        let (lo, hi) = resolve_ratio_axis(&keys, &values).unwrap();
        assert!((lo - 0.8).abs() < 1e-6);
        assert!((hi - 1.3).abs() < 1e-6);
        assert_eq!(resolve_ratio_axis(&keys, &[]).unwrap(), (0.5, 1.5));

        let keys: PlotKeys = [("RatioYMin", "0.9"), ("RatioYMax", "1.1")].into_iter().collect();
        assert_eq!(resolve_ratio_axis(&keys, &values).unwrap(), (0.9, 1.1));
    }
}

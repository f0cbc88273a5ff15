//! Coordinate derivation for step curves, ratios and ratio bands.
//!
//! Everything here is a pure function over series arrays.

use crate::error::{Error, Result};
use crate::series::AnnotatedSeries;

/// Step coordinates: low edges plus the final high edge, values plus the
/// last value repeated. Both have length `N + 1` (empty for an empty series).
pub fn step_polyline<S: AnnotatedSeries + ?Sized>(series: &S) -> (Vec<f32>, Vec<f32>) {
    let mut xs = series.xmin();
    let mut ys = series.y().to_vec();
    if let (Some(&high), Some(&last)) = (series.xmax().last(), series.y().last()) {
        xs.push(high);
        ys.push(last);
    }
    (xs, ys)
}

/// Bin edges as `low0, high0, low1, high1, ...` (length `2N`).
pub fn doubled_edges<S: AnnotatedSeries + ?Sized>(series: &S) -> Vec<f32> {
    series
        .xmin()
        .into_iter()
        .zip(series.xmax())
        .flat_map(|(lo, hi)| [lo, hi])
        .collect()
}

/// Every value twice, aligned with [`doubled_edges`].
pub fn doubled_values(values: &[f32]) -> Vec<f32> {
    values.iter().flat_map(|&v| [v, v]).collect()
}

fn check_binning<S, R>(series: &S, reference: &R) -> Result<()>
where
    S: AnnotatedSeries + ?Sized,
    R: AnnotatedSeries + ?Sized,
{
    let mismatch = |detail: String| Error::BinningMismatch {
        series: series.path().to_string(),
        reference: reference.path().to_string(),
        detail,
    };
    if series.len() != reference.len() {
        return Err(mismatch(format!(
            "{} bins vs {} bins",
            series.len(),
            reference.len()
        )));
    }
    let (lo, hi) = (series.xmin(), series.xmax());
    let (ref_lo, ref_hi) = (reference.xmin(), reference.xmax());
    for i in 0..lo.len() {
        if lo[i] != ref_lo[i] || hi[i] != ref_hi[i] {
            return Err(mismatch(format!(
                "bin {} is [{}, {}] vs [{}, {}]",
                i, lo[i], hi[i], ref_lo[i], ref_hi[i]
            )));
        }
    }
    Ok(())
}

/// Elementwise `series.y / reference.y`. Zero reference values give
/// infinities or NaN, exactly as float division does.
pub fn ratio<S, R>(series: &S, reference: &R) -> Result<Vec<f32>>
where
    S: AnnotatedSeries + ?Sized,
    R: AnnotatedSeries + ?Sized,
{
    check_binning(series, reference)?;
    Ok(series
        .y()
        .iter()
        .zip(reference.y())
        .map(|(y, r)| y / r)
        .collect())
}

/// Lower and upper edges of the reference uncertainty, relative to its value.
pub fn ratio_band<R: AnnotatedSeries + ?Sized>(reference: &R) -> (Vec<f32>, Vec<f32>) {
    let relative = |bound: Vec<f32>| -> Vec<f32> {
        bound.iter().zip(reference.y()).map(|(b, y)| b / y).collect()
    };
    (relative(reference.ymin()), relative(reference.ymax()))
}

/// Curve through the bin centres for `Line=smooth`: a natural cubic spline
/// sampled at `oversample * N` evenly spaced abscissae.
///
/// Fewer than 3 points (or a zero oversampling factor) fall back to the
/// centres themselves, i.e. the diagonal line.
pub fn smooth_curve<S: AnnotatedSeries + ?Sized>(series: &S, oversample: usize) -> (Vec<f32>, Vec<f32>) {
    let xs: Vec<f64> = series.x().iter().map(|&v| v as f64).collect();
    let ys: Vec<f64> = series.y().iter().map(|&v| v as f64).collect();
    let n = xs.len();
    if n < 3 || oversample == 0 {
        return (series.x().to_vec(), series.y().to_vec());
    }

    let m = natural_second_derivatives(&xs, &ys);
    let samples = oversample * n;
    let (lo, hi) = (xs[0], xs[n - 1]);
    let step = (hi - lo) / (samples - 1) as f64;

    let mut out_x = Vec::with_capacity(samples);
    let mut out_y = Vec::with_capacity(samples);
    let mut k = 0;
    for i in 0..samples {
        let t = if i == samples - 1 { hi } else { lo + step * i as f64 };
        while k < n - 2 && t > xs[k + 1] {
            k += 1;
        }
        let h = xs[k + 1] - xs[k];
        let a = (xs[k + 1] - t) / h;
        let b = (t - xs[k]) / h;
        let y = a * ys[k]
            + b * ys[k + 1]
            + ((a * a * a - a) * m[k] + (b * b * b - b) * m[k + 1]) * h * h / 6.0;
        out_x.push(t as f32);
        out_y.push(y as f32);
    }
    (out_x, out_y)
}

/// Second derivatives at the knots with zero curvature at both ends,
/// solved with the tridiagonal (Thomas) algorithm.
fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    for i in 1..n - 1 {
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        let a = h0;
        let b = 2.0 * (h0 + h1);
        let c = h1;
        let d = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
        let denom = b - a * c_prime[i - 1];
        c_prime[i] = c / denom;
        d_prime[i] = (d - a * d_prime[i - 1]) / denom;
    }
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}

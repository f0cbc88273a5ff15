//! Axis scaling and transformation.

mod linear;
mod log;

pub use linear::LinearScale;
pub use log::LogScale;

use crate::plotting::error::PlotResult;

/// Which kind of scale an axis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
}

impl ScaleKind {
    /// Build a fresh scale of this kind.
    pub fn build(self) -> Box<dyn Scale> {
        match self {
            ScaleKind::Linear => Box::new(LinearScale::auto()),
            ScaleKind::Log => Box::new(LogScale::auto()),
        }
    }
}

/// Trait for axis scale transformations.
pub trait Scale: std::fmt::Debug + Send {
    /// Transform a data value to normalized coordinates (0.0 - 1.0).
    ///
    /// Values the scale cannot represent (e.g. non-positive values on a log
    /// scale) map to NaN and are skipped by the renderers.
    fn transform(&self, value: f64) -> f64;

    /// Set the data range for this scale.
    fn set_range(&mut self, min: f64, max: f64) -> PlotResult<()>;

    /// Get the current data range.
    fn range(&self) -> (f64, f64);

    /// Generate tick values for this scale.
    fn ticks(&self, num_ticks: usize) -> Vec<f64>;

    fn kind(&self) -> ScaleKind;

    /// Clone the scale into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Scale>;
}

impl Clone for Box<dyn Scale> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Compute "nice" numbers for axis ticks.
pub fn nice_number(range: f64, round: bool) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10_f64.powf(exponent);

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * 10_f64.powf(exponent)
}

/// Generate nice tick positions within `[min, max]`, at most `num_ticks` of them.
pub fn nice_ticks(min: f64, max: f64, num_ticks: usize) -> Vec<f64> {
    if num_ticks < 2 || !(max > min) {
        return vec![(min + max) / 2.0];
    }

    let range = nice_number(max - min, false);
    let mut spacing = nice_number(range / (num_ticks - 1) as f64, true);
    loop {
        let ticks = ticks_with_spacing(min, max, spacing);
        if ticks.len() <= num_ticks {
            return ticks;
        }
        spacing = nice_number(spacing * 1.5, true);
    }
}

fn ticks_with_spacing(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    let first = (min / spacing).ceil() as i64;
    let last = (max / spacing).floor() as i64;
    (first..=last)
        .map(|i| {
            let tick = i as f64 * spacing;
            // Snap accumulated float noise (0.30000000000000004 -> 0.3)
            if tick.abs() < spacing * 1e-9 { 0.0 } else { tick }
        })
        .collect()
}

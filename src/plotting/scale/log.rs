//! Base-10 logarithmic scale.

use super::{nice_ticks, Scale, ScaleKind};
use crate::plotting::error::{PlotError, PlotResult};

/// A logarithmic scale. Both ends of the range must be positive.
#[derive(Debug, Clone)]
pub struct LogScale {
    min: f64,
    max: f64,
}

impl LogScale {
    /// Create a log scale spanning one decade (to be set later).
    pub fn auto() -> Self {
        LogScale { min: 1.0, max: 10.0 }
    }
}

impl Scale for LogScale {
    fn transform(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return f64::NAN;
        }
        let (lo, hi) = (self.min.log10(), self.max.log10());
        if hi == lo {
            return 0.5;
        }
        (value.log10() - lo) / (hi - lo)
    }

    fn set_range(&mut self, min: f64, max: f64) -> PlotResult<()> {
        if min <= 0.0 || max <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "log scale needs a positive range, got [{}, {}]",
                min, max
            )));
        }
        if min >= max {
            self.min = min / 10.0;
            self.max = max * 10.0;
        } else {
            self.min = min;
            self.max = max;
        }
        Ok(())
    }

    fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn ticks(&self, num_ticks: usize) -> Vec<f64> {
        let first = self.min.log10().ceil() as i32;
        let last = self.max.log10().floor() as i32;
        if last - first < 1 {
            // Less than two decades in view
            return nice_ticks(self.min, self.max, num_ticks);
        }
        let stride = ((last - first + 1) as usize).div_ceil(num_ticks.max(1)).max(1);
        (first..=last)
            .step_by(stride)
            .map(|e| 10_f64.powi(e))
            .collect()
    }

    fn kind(&self) -> ScaleKind {
        ScaleKind::Log
    }

    fn clone_box(&self) -> Box<dyn Scale> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_transform() {
        let mut scale = LogScale::auto();
        scale.set_range(1.0, 100.0).unwrap();
        assert!((scale.transform(10.0) - 0.5).abs() < 1e-12);
        assert!(scale.transform(0.0).is_nan());
        assert!(scale.set_range(0.0, 10.0).is_err());
    }

    #[test]
    fn test_decade_ticks() {
        let mut scale = LogScale::auto();
        scale.set_range(0.5, 2000.0).unwrap();
        assert_eq!(scale.ticks(5), vec![1.0, 10.0, 100.0, 1000.0]);
    }
}

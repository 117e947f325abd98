//! Personal baseline statistics over a user's prior systolic readings.

use vitaltrack_core::BaselineSample;

/// Systolic values that make up one user's baseline, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline {
    values: Vec<f64>,
}

/// Summary statistics of a baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divisor = count).
    pub std_dev: f64,
}

impl Baseline {
    /// Collect the systolic values of every sample allowed to contribute.
    pub fn from_samples<S: BaselineSample>(samples: &[S]) -> Self {
        Self {
            values: samples
                .iter()
                .filter(|s| s.counts_toward_baseline())
                .map(BaselineSample::systolic)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Population variance: mean of squared deviations.
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.values.len() as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn stats(&self) -> BaselineStats {
        BaselineStats {
            count: self.values.len(),
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }
}

impl BaselineStats {
    /// Absolute z-score of `value`. A perfectly flat baseline uses a
    /// standard deviation of 1.
    pub fn z_score(&self, value: f64) -> f64 {
        let divisor = if self.std_dev == 0.0 { 1.0 } else { self.std_dev };
        (value - self.mean).abs() / divisor
    }
}

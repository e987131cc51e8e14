//! Single-pass mean/variance accumulator (Welford's algorithm).

use serde::{Deserialize, Serialize};

/// Running count, mean and sum of squared deviations for one
/// (label, feature) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionRecord {
    n: u64,
    mean: f64,
    m2: f64,
}

impl DistributionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation in.
    pub fn update(&mut self, value: f64) {
        self.n += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    /// Sample variance, defined from two observations on.
    pub fn variance(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        Some(self.m2 / (self.n - 1) as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(|v| v.max(0.0).sqrt())
    }

    /// Absolute z-score of `value`, with `epsilon` added to the deviation so
    /// constant features stay finite.
    pub fn z_score(&self, value: f64, epsilon: f64) -> Option<f64> {
        self.std_dev()
            .map(|sd| (value - self.mean).abs() / (sd + epsilon))
    }
}

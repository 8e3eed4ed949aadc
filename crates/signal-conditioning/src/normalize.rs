//! Z-score normalization

use crate::stats::{mean, std_dev, STD_EPSILON};

/// Normalize to zero mean and unit variance.
///
/// A zero-variance series maps to all zeros instead of NaN/Inf.
pub fn normalize(series: &[f64]) -> Vec<f64> {
    let sd = std_dev(series);
    if sd <= STD_EPSILON {
        return vec![0.0; series.len()];
    }
    let m = mean(series);
    series.iter().map(|v| (v - m) / sd).collect()
}

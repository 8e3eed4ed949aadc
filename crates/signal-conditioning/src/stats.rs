//! Statistical helpers over scalar series
//!
//! Every function is total: empty input yields `0.0` rather than NaN.

/// Standard deviations at or below this are treated as zero variance
pub const STD_EPSILON: f64 = 1e-9;

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Root mean square
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Mean over standard deviation, the confidence proxy used across analyzers.
///
/// Fewer than two values or zero variance yields `0.0`.
pub fn signal_to_noise(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sd = std_dev(values);
    if sd <= STD_EPSILON {
        return 0.0;
    }
    mean(values) / sd
}

/// Whether a series has (numerically) zero variance
pub fn is_flat(values: &[f64]) -> bool {
    std_dev(values) <= STD_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((mean(&values) - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_computation() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(signal_to_noise(&[]), 0.0);
    }

    #[test]
    fn test_snr_degenerate() {
        assert_eq!(signal_to_noise(&[5.0]), 0.0);
        assert_eq!(signal_to_noise(&[3.0, 3.0, 3.0]), 0.0);
        assert!(is_flat(&[0.1; 10]));
    }

    #[test]
    fn test_snr_value() {
        // mean 2, std 1
        let snr = signal_to_noise(&[1.0, 3.0]);
        assert!((snr - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rms() {
        assert!((rms(&[3.0, -3.0]) - 3.0).abs() < 1e-12);
    }
}

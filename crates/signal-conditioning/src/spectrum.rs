//! FFT-based dominant-frequency estimation

use rustfft::{num_complex::Complex, FftPlanner};

/// Spectral analyzer for pulse-rate cross-checks
pub struct SpectralAnalyzer {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
    /// Sampling frequency (Hz)
    sample_rate: f64,
}

impl SpectralAnalyzer {
    /// Create a new spectral analyzer
    pub fn new(sample_rate: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate,
        }
    }

    /// Apply Hamming window to reduce spectral leakage
    fn apply_hamming_window(signal: &mut [f64]) {
        let n = signal.len();
        for (i, v) in signal.iter_mut().enumerate() {
            let window =
                0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos();
            *v *= window;
        }
    }

    /// Frequency (Hz) carrying the most power inside `[low_hz, high_hz]`.
    ///
    /// Returns `None` for series shorter than 4 samples, when no FFT bin
    /// falls inside the band, or when the band holds no power.
    pub fn dominant_frequency(&mut self, signal: &[f64], low_hz: f64, high_hz: f64) -> Option<f64> {
        let n = signal.len();
        if n < 4 || !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return None;
        }

        let mut windowed = signal.to_vec();
        Self::apply_hamming_window(&mut windowed);

        let mut buffer: Vec<Complex<f64>> =
            windowed.iter().map(|&v| Complex::new(v, 0.0)).collect();
        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let freq_resolution = self.sample_rate / n as f64;
        let (best_bin, best_power) = buffer
            .iter()
            .take(n / 2 + 1)
            .enumerate()
            .skip(1)
            .filter(|(i, _)| {
                let f = *i as f64 * freq_resolution;
                f >= low_hz && f <= high_hz
            })
            .map(|(i, c)| (i, c.norm_sqr()))
            .fold((None, 0.0), |(best, max), (i, p)| {
                if p > max {
                    (Some(i), p)
                } else {
                    (best, max)
                }
            });

        if best_power <= 0.0 {
            return None;
        }
        best_bin.map(|i| i as f64 * freq_resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_sine_wave() {
        let mut analyzer = SpectralAnalyzer::new(30.0);
        // 1.2 Hz sine, 20 s
        let signal: Vec<f64> = (0..600)
            .map(|i| (2.0 * std::f64::consts::PI * 1.2 * i as f64 / 30.0).sin())
            .collect();
        let f = analyzer.dominant_frequency(&signal, 0.5, 4.0).unwrap();
        assert!((f - 1.2).abs() < 0.1);
    }

    #[test]
    fn test_empty_and_flat() {
        let mut analyzer = SpectralAnalyzer::new(30.0);
        assert!(analyzer.dominant_frequency(&[], 0.5, 4.0).is_none());
        assert!(analyzer.dominant_frequency(&[0.0; 64], 0.5, 4.0).is_none());
    }
}

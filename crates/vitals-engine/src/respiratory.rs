//! Respiratory rate from whole-frame motion energy

use crate::config::EngineConfig;
use crate::types::{Confidence, VitalMetric};
use crate::VitalsError;
use signal_conditioning::peaks_above;
use signal_conditioning::stats::{is_flat, mean, signal_to_noise, std_dev};

pub const METHODOLOGY: &str = "Breathing cycles counted as motion-energy peaks above mean + 1 SD";

/// Counts breathing cycles in a motion-energy series
pub struct RespiratoryAnalyzer {
    snr_high: f64,
    snr_moderate: f64,
}

impl RespiratoryAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            snr_high: config.snr_high,
            snr_moderate: config.snr_moderate,
        }
    }

    /// Local maxima exceeding `mean + std` of the series
    pub fn count_cycles(motion: &[f64]) -> usize {
        peaks_above(motion, mean(motion) + std_dev(motion)).len()
    }

    /// Breaths per minute over a recording of `frame_count` frames
    pub fn analyze(
        &self,
        motion: &[f64],
        frame_count: usize,
        sampling_rate: f64,
    ) -> Result<(f64, Confidence), VitalsError> {
        if motion.len() < 2 {
            return Err(VitalsError::InsufficientData {
                needed: 2,
                got: motion.len(),
            });
        }
        if is_flat(motion) {
            return Err(VitalsError::DegenerateSignal("motion energy has zero variance"));
        }

        let duration_secs = frame_count as f64 / sampling_rate;
        let rate = Self::count_cycles(motion) as f64 * 60.0 / duration_secs;
        let confidence =
            Confidence::from_score(signal_to_noise(motion), self.snr_high, self.snr_moderate);

        Ok((rate, confidence))
    }

    pub fn metric(&self, motion: &[f64], frame_count: usize, sampling_rate: f64) -> VitalMetric {
        match self.analyze(motion, frame_count, sampling_rate) {
            Ok((rate, confidence)) => {
                VitalMetric::measured(rate, "breaths/min", confidence, METHODOLOGY)
            }
            Err(e) => VitalMetric::failed("breaths/min", METHODOLOGY, &e),
        }
    }
}

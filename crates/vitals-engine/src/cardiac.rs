//! Heart rate and HRV from the conditioned green channel

use crate::config::EngineConfig;
use crate::types::{Confidence, HrvDetail, QualityLevel, SignalQuality, VitalMetric};
use crate::VitalsError;
use signal_conditioning::stats::{mean, signal_to_noise, std_dev};
use signal_conditioning::{find_peaks, values_at, SpectralAnalyzer};

/// Beats detected on one conditioned series
#[derive(Debug, Clone, PartialEq)]
pub struct BeatSeries {
    pub peaks: Vec<usize>,
    /// Conditioned amplitude at each peak
    pub peak_values: Vec<f64>,
    /// Inter-peak intervals (ms)
    pub intervals_ms: Vec<f64>,
    pub duration_secs: f64,
}

/// Root mean square of successive interval differences; `0.0` for fewer
/// than two intervals.
pub fn rmssd(intervals_ms: &[f64]) -> f64 {
    if intervals_ms.len() < 2 {
        return 0.0;
    }
    let squared: Vec<f64> = intervals_ms
        .windows(2)
        .map(|w| (w[1] - w[0]) * (w[1] - w[0]))
        .collect();
    mean(&squared).sqrt()
}

/// Peak-counting heart rate and HRV analyzer
pub struct CardiacAnalyzer {
    snr_high: f64,
    snr_moderate: f64,
    band: (f64, f64),
}

impl CardiacAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            snr_high: config.snr_high,
            snr_moderate: config.snr_moderate,
            band: (config.band_low_hz, config.band_high_hz),
        }
    }

    fn bucket(&self, snr: f64) -> Confidence {
        Confidence::from_score(snr, self.snr_high, self.snr_moderate)
    }

    /// Locate beats on a conditioned series
    pub fn detect_beats(
        &self,
        conditioned: &[f64],
        sampling_rate: f64,
    ) -> Result<BeatSeries, VitalsError> {
        if conditioned.len() < 2 {
            return Err(VitalsError::InsufficientData {
                needed: 2,
                got: conditioned.len(),
            });
        }

        let peaks = find_peaks(conditioned);
        let peak_values = values_at(conditioned, &peaks);
        let intervals_ms = peaks
            .windows(2)
            .map(|w| (w[1] - w[0]) as f64 / sampling_rate * 1000.0)
            .collect();

        Ok(BeatSeries {
            peaks,
            peak_values,
            intervals_ms,
            duration_secs: conditioned.len() as f64 / sampling_rate,
        })
    }

    /// Beats per minute, rounded to the nearest integer
    pub fn heart_rate(&self, beats: &BeatSeries) -> (f64, Confidence) {
        let bpm = (beats.peaks.len() as f64 * 60.0 / beats.duration_secs).round();
        (bpm, self.bucket(signal_to_noise(&beats.peak_values)))
    }

    /// RMSSD in ms; fewer than two beats gives `0.0` at low confidence
    pub fn hrv(&self, beats: &BeatSeries) -> (f64, Confidence, HrvDetail) {
        let detail = HrvDetail {
            rmssd_ms: rmssd(&beats.intervals_ms),
            sdnn_ms: std_dev(&beats.intervals_ms),
            mean_interval_ms: mean(&beats.intervals_ms),
            interval_count: beats.intervals_ms.len(),
        };

        let confidence = if beats.peaks.len() < 2 {
            Confidence::Low
        } else {
            self.bucket(signal_to_noise(&beats.intervals_ms))
        };

        (detail.rmssd_ms, confidence, detail)
    }

    /// Signal quality of the cardiac channel
    pub fn signal_quality(&self, beats: &BeatSeries) -> SignalQuality {
        let snr = signal_to_noise(&beats.peak_values);
        let confidence = self.bucket(snr);
        SignalQuality {
            signal_to_noise: snr,
            quality: if confidence == Confidence::Low {
                QualityLevel::Poor
            } else {
                QualityLevel::Good
            },
            confidence,
        }
    }

    /// Dominant in-band frequency as bpm, for cross-checking peak counting
    pub fn spectral_bpm(&self, conditioned: &[f64], sampling_rate: f64) -> Option<f64> {
        SpectralAnalyzer::new(sampling_rate)
            .dominant_frequency(conditioned, self.band.0, self.band.1)
            .map(|hz| hz * 60.0)
    }

    pub fn heart_rate_metric(&self, beats: &BeatSeries, filter: &str) -> VitalMetric {
        let (bpm, confidence) = self.heart_rate(beats);
        VitalMetric::measured(bpm, "bpm", confidence, heart_rate_methodology(filter))
    }
}

pub fn heart_rate_methodology(filter: &str) -> String {
    format!("rPPG peak counting on normalized green channel ({filter} filter)")
}

//! SpO2 estimation by ratio of ratios
//!
//! The infrared channel is synthesized from red and blue; no true IR
//! sensor is involved, so the estimate is experimental.
//!
//! Steps:
//! 1. red and synthetic IR channels
//! 2. normalize then band-limit each
//! 3. AC/DC decomposition (one-second moving-average baseline)
//! 4. R = blend of amplitude ratio and area ratio
//! 5. linear calibration clamped to the configured range
//! 6. quality score from SNR, stability, and physiological validity

use crate::config::EngineConfig;
use crate::types::{Confidence, OximetryDetail};
use crate::VitalsError;
use frame_capture::ChannelSeries;
use serde::{Deserialize, Serialize};
use signal_conditioning::stats::{is_flat, mean, signal_to_noise, std_dev, STD_EPSILON};
use signal_conditioning::{find_peaks, find_troughs, moving_average, normalize, values_at, BandpassFilter};

pub const METHODOLOGY: &str =
    "Ratio of ratios on red and synthetic infrared (0.6 R + 0.4 B) channels; experimental";

/// Pulsatile (AC) and baseline (DC) parts of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcDcComponents {
    /// Peak-to-trough amplitude in raw channel units
    pub ac: f64,
    /// Mean one-second baseline of the raw channel
    pub dc: f64,
    /// `ac / dc * 100`
    pub perfusion: f64,
    pub peak_indices: Vec<usize>,
    pub trough_indices: Vec<usize>,
}

impl AcDcComponents {
    /// Decompose a channel.
    ///
    /// `raw` supplies the DC level; `conditioned` (normalized and
    /// band-limited `raw`) supplies the pulsatile shape. The AC amplitude
    /// is rescaled by the raw standard deviation to undo normalization.
    pub fn extract(
        raw: &[f64],
        conditioned: &[f64],
        sampling_rate: f64,
    ) -> Result<Self, VitalsError> {
        if raw.len() < 2 || conditioned.len() != raw.len() {
            return Err(VitalsError::InsufficientData {
                needed: 2,
                got: raw.len().min(conditioned.len()),
            });
        }

        let window = (sampling_rate.round() as usize).max(1);
        let dc = mean(&moving_average(raw, window));
        if dc.abs() <= STD_EPSILON {
            return Err(VitalsError::DegenerateSignal("DC component is zero"));
        }

        let baseline = moving_average(conditioned, window);
        let ac_series: Vec<f64> = conditioned
            .iter()
            .zip(&baseline)
            .map(|(s, b)| s - b)
            .collect();

        let peak_indices = find_peaks(&ac_series);
        let trough_indices = find_troughs(&ac_series);
        if peak_indices.is_empty() || trough_indices.is_empty() {
            return Err(VitalsError::DegenerateSignal("no pulsatile component"));
        }

        let amplitude = mean(&values_at(&ac_series, &peak_indices))
            - mean(&values_at(&ac_series, &trough_indices));
        let ac = amplitude * std_dev(raw);

        Ok(Self {
            ac,
            dc,
            perfusion: ac / dc * 100.0,
            peak_indices,
            trough_indices,
        })
    }

    /// AC/DC ratio
    pub fn ratio(&self) -> f64 {
        self.ac / self.dc
    }
}

/// `intercept - slope * R`, clamped to `[min, max]`
pub fn calibrate(ratio: f64, config: &EngineConfig) -> f64 {
    (config.calibration_intercept - config.calibration_slope * ratio)
        .clamp(config.spo2_min, config.spo2_max)
}

/// Default calibration curve: `clamp(110 - 25 R, 70, 100)`
pub fn calibrated_spo2(ratio: f64) -> f64 {
    calibrate(ratio, &EngineConfig::default())
}

/// A successful SpO2 estimate
#[derive(Debug, Clone, PartialEq)]
pub struct Spo2Reading {
    pub spo2: f64,
    pub confidence: Confidence,
    pub detail: OximetryDetail,
}

/// Ratio-of-ratios SpO2 estimator
pub struct Spo2Estimator<'a> {
    config: &'a EngineConfig,
}

impl<'a> Spo2Estimator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Estimate SpO2 from the raw RGB series
    pub fn estimate(
        &self,
        channels: &ChannelSeries,
        filter: &dyn BandpassFilter,
        sampling_rate: f64,
    ) -> Result<Spo2Reading, VitalsError> {
        let n = channels.len();
        if n < 2 {
            return Err(VitalsError::InsufficientData { needed: 2, got: n });
        }

        let red = &channels.red;
        let ir: Vec<f64> = channels
            .red
            .iter()
            .zip(&channels.blue)
            .map(|(r, b)| self.config.ir_red_weight * r + self.config.ir_blue_weight * b)
            .collect();

        if is_flat(red) {
            return Err(VitalsError::DegenerateSignal("red channel has zero variance"));
        }
        if is_flat(&ir) {
            return Err(VitalsError::DegenerateSignal("infrared channel has zero variance"));
        }

        let red_filtered = filter.apply(&normalize(red));
        let ir_filtered = filter.apply(&normalize(&ir));

        let red_acdc = AcDcComponents::extract(red, &red_filtered, sampling_rate)?;
        let ir_acdc = AcDcComponents::extract(&ir, &ir_filtered, sampling_rate)?;

        let ir_ratio = ir_acdc.ratio();
        if ir_ratio.abs() <= STD_EPSILON {
            return Err(VitalsError::DegenerateSignal("infrared AC component is zero"));
        }
        let amplitude_ratio = red_acdc.ratio() / ir_ratio;

        let ir_area: f64 = ir_filtered.iter().map(|v| v.abs()).sum();
        if ir_area <= STD_EPSILON {
            return Err(VitalsError::DegenerateSignal("infrared area is zero"));
        }
        let area_ratio = red_filtered.iter().map(|v| v.abs()).sum::<f64>() / ir_area;

        let ratio = self.blend_ratio(amplitude_ratio, area_ratio)?;

        let in_range = (self.config.ratio_valid_min..=self.config.ratio_valid_max).contains(&ratio);
        let quality_score = self.quality_score(red, &ir, &red_filtered, &ir_filtered, in_range);
        let confidence = if in_range {
            Confidence::from_score(
                quality_score,
                self.config.spo2_quality_high,
                self.config.spo2_quality_moderate,
            )
        } else {
            Confidence::Low
        };

        Ok(Spo2Reading {
            spo2: calibrate(ratio, self.config),
            confidence,
            detail: OximetryDetail {
                ratio,
                amplitude_ratio,
                area_ratio,
                perfusion_index: red_acdc.perfusion,
                quality_score,
                in_physiological_range: in_range,
            },
        })
    }

    /// Weighted blend of the amplitude and area ratios; a non-finite blend
    /// cannot be calibrated
    pub fn blend_ratio(&self, amplitude_ratio: f64, area_ratio: f64) -> Result<f64, VitalsError> {
        let ratio = self.config.amplitude_ratio_weight * amplitude_ratio
            + self.config.area_ratio_weight * area_ratio;
        if !ratio.is_finite() {
            return Err(VitalsError::OutOfRangeCalibration { ratio });
        }
        Ok(ratio)
    }

    /// `0.4 * snr + 0.4 * stability + 0.2 * validity`, each term in [0, 1]
    fn quality_score(
        &self,
        red: &[f64],
        ir: &[f64],
        red_filtered: &[f64],
        ir_filtered: &[f64],
        in_range: bool,
    ) -> f64 {
        let magnitude = |s: &[f64]| s.iter().map(|v| v.abs()).collect::<Vec<_>>();
        let snr = (signal_to_noise(&magnitude(red_filtered)) + signal_to_noise(&magnitude(ir_filtered)))
            / 2.0;
        let snr_term = (snr / self.config.snr_high).clamp(0.0, 1.0);

        let stability = (1.0 / std_dev(red) + 1.0 / std_dev(ir)) / 2.0 / 2.0;
        let stability_term = stability.clamp(0.0, 1.0);

        let validity_term = if in_range { 1.0 } else { 0.0 };

        0.4 * snr_term + 0.4 * stability_term + 0.2 * validity_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VitalMetric;
    use proptest::prelude::*;
    use signal_conditioning::{BandSpec, MovingAverageBandpass};
    use std::f64::consts::PI;

    fn filter(fs: f64) -> MovingAverageBandpass {
        MovingAverageBandpass::new(BandSpec::new(0.5, 4.0, fs, 5).unwrap())
    }

    fn pulsatile(fs: f64, seconds: f64) -> ChannelSeries {
        let n = (fs * seconds) as usize;
        let wave = |i: usize, phase: f64| (2.0 * PI * 1.2 * i as f64 / fs + phase).sin();
        ChannelSeries {
            red: (0..n).map(|i| 150.0 + 2.0 * wave(i, 0.0)).collect(),
            green: (0..n).map(|i| 120.0 + 3.0 * wave(i, 0.0)).collect(),
            blue: (0..n).map(|i| 100.0 + 1.5 * wave(i, 0.2)).collect(),
        }
    }

    #[test]
    fn test_calibration_points() {
        assert_eq!(calibrated_spo2(1.0), 85.0);
        assert_eq!(calibrated_spo2(0.0), 100.0);
        assert_eq!(calibrated_spo2(2.0), 70.0);
        assert_eq!(calibrated_spo2(0.6), 95.0);
    }

    #[test]
    fn test_constant_series_fails() {
        let channels = ChannelSeries {
            red: vec![150.0; 50],
            green: vec![120.0; 50],
            blue: vec![100.0; 50],
        };
        let config = EngineConfig::default();
        let err = Spo2Estimator::new(&config)
            .estimate(&channels, &filter(5.0), 5.0)
            .unwrap_err();
        assert!(matches!(err, VitalsError::DegenerateSignal(_)));
    }

    #[test]
    fn test_pulsatile_signal_in_range() {
        let config = EngineConfig::default();
        let fs = 30.0;
        let reading = Spo2Estimator::new(&config)
            .estimate(&pulsatile(fs, 20.0), &filter(fs), fs)
            .unwrap();
        assert!((70.0..=100.0).contains(&reading.spo2));
        assert!(reading.detail.ratio.is_finite());
        assert!(reading.detail.perfusion_index > 0.0);
        assert!(reading.detail.in_physiological_range);
        assert!((0.0..=1.0).contains(&reading.detail.quality_score));
    }

    #[test]
    fn test_ratio_above_range_is_clamped_low_confidence() {
        // blue swings against red, so the synthetic IR pulse is ~0.2 units
        let fs = 30.0;
        let wave = |i: usize| (2.0 * PI * 1.2 * i as f64 / fs).sin();
        let channels = ChannelSeries {
            red: (0..600).map(|i| 150.0 + 2.0 * wave(i)).collect(),
            green: (0..600).map(|i| 120.0 + 3.0 * wave(i)).collect(),
            blue: (0..600).map(|i| 100.0 - 2.5 * wave(i)).collect(),
        };
        let config = EngineConfig::default();
        let reading = Spo2Estimator::new(&config)
            .estimate(&channels, &filter(fs), fs)
            .unwrap();

        assert!(reading.detail.ratio > config.ratio_valid_max, "R = {}", reading.detail.ratio);
        assert!(!reading.detail.in_physiological_range);
        assert_eq!(reading.confidence, Confidence::Low);
        assert_eq!(reading.spo2, config.spo2_min);
    }

    #[test]
    fn test_non_finite_ratio_cannot_be_calibrated() {
        let config = EngineConfig::default();
        let estimator = Spo2Estimator::new(&config);

        for (amplitude, area) in [(f64::NAN, 1.0), (f64::INFINITY, 1.0), (1.0, f64::NEG_INFINITY)] {
            let err = estimator.blend_ratio(amplitude, area).unwrap_err();
            assert!(matches!(err, VitalsError::OutOfRangeCalibration { .. }));

            let metric: VitalMetric = VitalMetric::failed("%", METHODOLOGY, &err);
            assert!(metric.value.is_none());
            assert_eq!(metric.confidence, Confidence::Low);
        }

        // 0.6 * 1.0 + 0.4 * 1.0
        assert!((estimator.blend_ratio(1.0, 1.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_acdc_perfusion() {
        let fs = 10.0;
        let raw: Vec<f64> = (0..200)
            .map(|i| 100.0 + (2.0 * PI * 1.2 * i as f64 / fs).sin())
            .collect();
        let conditioned = normalize(&raw);
        let acdc = AcDcComponents::extract(&raw, &conditioned, fs).unwrap();
        assert!((acdc.dc - 100.0).abs() < 0.5);
        assert!(acdc.ac > 1.0 && acdc.ac < 2.5, "ac = {}", acdc.ac);
        assert!((acdc.perfusion - acdc.ac / acdc.dc * 100.0).abs() < 1e-12);
        assert!(!acdc.peak_indices.is_empty());
    }

    #[test]
    fn test_zero_dc_guard() {
        let raw = vec![0.0; 40];
        let conditioned: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let err = AcDcComponents::extract(&raw, &conditioned, 10.0).unwrap_err();
        assert_eq!(err, VitalsError::DegenerateSignal("DC component is zero"));
    }

    proptest! {
        #[test]
        fn prop_calibration_bounded(r in -1e6f64..1e6) {
            let s = calibrated_spo2(r);
            prop_assert!((70.0..=100.0).contains(&s));
        }

        #[test]
        fn prop_calibration_monotonic(a in -10.0f64..10.0, b in -10.0f64..10.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(calibrated_spo2(hi) <= calibrated_spo2(lo));
        }
    }
}

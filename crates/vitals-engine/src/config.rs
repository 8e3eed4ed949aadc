//! Engine configuration

use crate::VitalsError;
use serde::{Deserialize, Serialize};
use signal_conditioning::FilterKind;
use std::path::Path;

/// Vital-sign engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lower edge of the cardiac band (Hz)
    pub band_low_hz: f64,

    /// Upper edge of the cardiac band (Hz)
    pub band_high_hz: f64,

    /// Filter order; the moving-average baseline uses it as window length
    pub filter_order: usize,

    /// Bandpass implementation
    pub filter_kind: FilterKind,

    /// SNR above which heart rate, HRV, and respiration are high confidence
    pub snr_high: f64,

    /// SNR above which they are moderate confidence
    pub snr_moderate: f64,

    /// SpO2 quality-score thresholds
    pub spo2_quality_high: f64,
    pub spo2_quality_moderate: f64,

    /// Synthetic infrared channel = red_weight * R + blue_weight * B
    pub ir_red_weight: f64,
    pub ir_blue_weight: f64,

    /// Blend of amplitude and area ratio estimators
    pub amplitude_ratio_weight: f64,
    pub area_ratio_weight: f64,

    /// SpO2 = intercept - slope * R
    pub calibration_intercept: f64,
    pub calibration_slope: f64,

    /// SpO2 clamp range (%)
    pub spo2_min: f64,
    pub spo2_max: f64,

    /// Physiologically valid ratio-of-ratios band
    pub ratio_valid_min: f64,
    pub ratio_valid_max: f64,

    /// Minimum frames per request
    pub min_frames: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            band_low_hz: 0.5,
            band_high_hz: 4.0,
            filter_order: 5,
            filter_kind: FilterKind::MovingAverage,
            snr_high: 2.0,
            snr_moderate: 1.0,
            spo2_quality_high: 0.8,
            spo2_quality_moderate: 0.6,
            ir_red_weight: 0.6,
            ir_blue_weight: 0.4,
            amplitude_ratio_weight: 0.6,
            area_ratio_weight: 0.4,
            calibration_intercept: 110.0,
            calibration_slope: 25.0,
            spo2_min: 70.0,
            spo2_max: 100.0,
            ratio_valid_min: 0.5,
            ratio_valid_max: 2.0,
            min_frames: 2,
        }
    }
}

impl EngineConfig {
    /// Stricter confidence thresholds and a real bandpass
    pub fn strict() -> Self {
        Self {
            filter_kind: FilterKind::Biquad,
            filter_order: 4,
            snr_high: 3.0,
            snr_moderate: 1.5,
            spo2_quality_high: 0.85,
            spo2_quality_moderate: 0.7,
            min_frames: 30,
            ..Default::default()
        }
    }

    /// Looser confidence thresholds
    pub fn lenient() -> Self {
        Self {
            snr_high: 1.5,
            snr_moderate: 0.75,
            spo2_quality_high: 0.7,
            spo2_quality_moderate: 0.5,
            ..Default::default()
        }
    }

    /// Load from an optional file, overridden by `VITALS__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, VitalsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix("VITALS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| VitalsError::Config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the analyzers cannot run with
    pub fn validate(&self) -> Result<(), VitalsError> {
        let finite = [
            self.band_low_hz,
            self.band_high_hz,
            self.snr_high,
            self.snr_moderate,
            self.spo2_quality_high,
            self.spo2_quality_moderate,
            self.ir_red_weight,
            self.ir_blue_weight,
            self.amplitude_ratio_weight,
            self.area_ratio_weight,
            self.calibration_intercept,
            self.calibration_slope,
            self.spo2_min,
            self.spo2_max,
            self.ratio_valid_min,
            self.ratio_valid_max,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(VitalsError::Config("all numeric settings must be finite".into()));
        }
        if self.band_low_hz < 0.0 || self.band_low_hz >= self.band_high_hz {
            return Err(VitalsError::Config(format!(
                "cardiac band [{}, {}] Hz is inverted",
                self.band_low_hz, self.band_high_hz
            )));
        }
        if self.filter_order == 0 {
            return Err(VitalsError::Config("filter_order must be >= 1".into()));
        }
        if self.snr_high <= self.snr_moderate
            || self.spo2_quality_high <= self.spo2_quality_moderate
        {
            return Err(VitalsError::Config(
                "high thresholds must exceed moderate thresholds".into(),
            ));
        }
        if self.spo2_min >= self.spo2_max || self.ratio_valid_min >= self.ratio_valid_max {
            return Err(VitalsError::Config("SpO2 ranges are inverted".into()));
        }
        if self.min_frames < 2 {
            return Err(VitalsError::Config("min_frames must be >= 2".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::strict().validate().is_ok());
        assert!(EngineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = EngineConfig {
            band_low_hz: 4.0,
            band_high_hz: 0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(VitalsError::Config(_))));
    }

    #[test]
    fn test_threshold_order_rejected() {
        let config = EngineConfig {
            snr_high: 1.0,
            snr_moderate: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("vitals-engine-{}.toml", std::process::id()));
        std::fs::write(&path, "filter_order = 7\nfilter_kind = \"biquad\"\nsnr_high = 2.5\n").unwrap();

        let config = EngineConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.filter_order, 7);
        assert_eq!(config.filter_kind, FilterKind::Biquad);
        assert_eq!(config.snr_high, 2.5);
        assert_eq!(config.calibration_intercept, 110.0);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = Path::new("/nonexistent/vitals.toml");
        assert!(matches!(
            EngineConfig::load(Some(path)),
            Err(VitalsError::Config(_))
        ));
    }
}

//! Single-pass vital-sign pipeline
//!
//! frames -> channel means + motion energy -> conditioned green ->
//! {cardiac, SpO2, respiration, heuristics} -> bundle

use crate::cardiac::{heart_rate_methodology, CardiacAnalyzer};
use crate::config::EngineConfig;
use crate::heuristics::{
    blood_pressure_metric, mood_metric, stress_metric, ScoredInput, BP_METHODOLOGY,
    MOOD_METHODOLOGY,
};
use crate::respiratory::{self, RespiratoryAnalyzer};
use crate::spo2::{self, Spo2Estimator};
use crate::types::{
    BloodPressure, Confidence, HrvDetail, OximetryDetail, QualityLevel, SignalQuality,
    VitalMetric, VitalsBundle,
};
use crate::VitalsError;
use frame_capture::{
    ensure_ordered, motion_energy, reduce_frames, ChannelSeries, FrameSample, VideoFrame,
};
use signal_conditioning::stats::is_flat;
use signal_conditioning::{normalize, BandSpec, BandpassFilter, SignalError};
use tracing::{debug, info, warn};

const HRV_METHODOLOGY: &str = "RMSSD of inter-peak intervals on the conditioned green channel";

/// Metrics derived from the band-limited colour channels
struct PulseMetrics {
    heart_rate: VitalMetric,
    hrv: VitalMetric,
    hrv_detail: Option<HrvDetail>,
    spo2: VitalMetric,
    oximetry: Option<OximetryDetail>,
    blood_pressure: VitalMetric<BloodPressure>,
    signal_quality: SignalQuality,
    spectral_heart_rate: Option<f64>,
    peaks: usize,
}

impl PulseMetrics {
    /// Every pulse metric null, carrying the same error
    fn failed(filter: &str, err: &VitalsError) -> Self {
        Self {
            heart_rate: VitalMetric::failed("bpm", heart_rate_methodology(filter), err),
            hrv: VitalMetric::failed("ms", HRV_METHODOLOGY, err),
            hrv_detail: None,
            spo2: VitalMetric::failed("%", spo2::METHODOLOGY, err),
            oximetry: None,
            blood_pressure: VitalMetric::failed("mmHg", BP_METHODOLOGY, err),
            signal_quality: SignalQuality {
                signal_to_noise: 0.0,
                quality: QualityLevel::Poor,
                confidence: Confidence::Low,
            },
            spectral_heart_rate: None,
            peaks: 0,
        }
    }
}

/// Vital-sign estimation engine.
///
/// Holds configuration only; every call is an independent pure run.
#[derive(Debug, Clone, Default)]
pub struct VitalsEngine {
    config: EngineConfig,
}

impl VitalsEngine {
    pub fn new(config: EngineConfig) -> Result<Self, VitalsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Estimate every vital sign from an ordered frame sequence.
    ///
    /// Frames are consumed and released once the channel means and motion
    /// energy have been extracted. Fails only when the request as a whole
    /// is unusable; individual metric failures come back as `null` values.
    pub fn estimate_vitals(
        &self,
        frames: Vec<VideoFrame>,
        sampling_rate: f64,
    ) -> Result<VitalsBundle, VitalsError> {
        check_sampling_rate(sampling_rate)?;
        if frames.len() < self.config.min_frames {
            return Err(VitalsError::InsufficientData {
                needed: self.config.min_frames,
                got: frames.len(),
            });
        }

        let samples = reduce_frames(&frames)?;
        let motion = motion_energy(&frames).map_err(VitalsError::from);
        drop(frames);

        if let Err(e) = &motion {
            warn!(error = %e, "motion energy unavailable");
        }
        Ok(self.analyze(&samples, motion.as_deref(), sampling_rate))
    }

    /// Estimate from already-reduced channel means and motion energy
    pub fn estimate_from_signals(
        &self,
        samples: &[FrameSample],
        motion: &[f64],
        sampling_rate: f64,
    ) -> Result<VitalsBundle, VitalsError> {
        check_sampling_rate(sampling_rate)?;
        if samples.len() < self.config.min_frames {
            return Err(VitalsError::InsufficientData {
                needed: self.config.min_frames,
                got: samples.len(),
            });
        }
        ensure_ordered(samples)?;

        Ok(self.analyze(samples, Ok(motion), sampling_rate))
    }

    fn analyze(
        &self,
        samples: &[FrameSample],
        motion: Result<&[f64], &VitalsError>,
        sampling_rate: f64,
    ) -> VitalsBundle {
        let channels = ChannelSeries::from_samples(samples);
        let frame_count = channels.len();

        let pulse = self.pulse_metrics(&channels, sampling_rate).unwrap_or_else(|e| {
            warn!(error = %e, "pulse analysis unavailable");
            PulseMetrics::failed(self.config.filter_kind.name(), &e)
        });
        log_failure("blood_pressure", &pulse.blood_pressure);

        let (respiratory_rate, mood) = match motion {
            Ok(motion) => (
                RespiratoryAnalyzer::new(&self.config).metric(motion, frame_count, sampling_rate),
                mood_metric(motion),
            ),
            Err(e) => (
                VitalMetric::failed("breaths/min", respiratory::METHODOLOGY, e),
                VitalMetric::failed("category", MOOD_METHODOLOGY, e),
            ),
        };
        log_failure("respiratory_rate", &respiratory_rate);
        log_failure("mood", &mood);

        let stress = stress_metric(scored(&pulse.hrv), scored(&respiratory_rate));
        log_failure("stress", &stress);

        let bundle = VitalsBundle {
            heart_rate: pulse.heart_rate,
            hrv: pulse.hrv,
            respiratory_rate,
            spo2: pulse.spo2,
            blood_pressure: pulse.blood_pressure,
            stress,
            mood,
            signal_quality: pulse.signal_quality,
            hrv_detail: pulse.hrv_detail,
            oximetry: pulse.oximetry,
            spectral_heart_rate: pulse.spectral_heart_rate,
            frame_count,
            sampling_rate,
        };

        log_summary(&bundle, pulse.peaks);
        bundle
    }

    /// Heart rate, HRV, SpO2 and blood pressure.
    ///
    /// Fails as a group when the cardiac band cannot be realised at this
    /// sampling rate.
    fn pulse_metrics(
        &self,
        channels: &ChannelSeries,
        sampling_rate: f64,
    ) -> Result<PulseMetrics, VitalsError> {
        let spec = BandSpec::new(
            self.config.band_low_hz,
            self.config.band_high_hz,
            sampling_rate,
            self.config.filter_order,
        )?;
        let filter = self.config.filter_kind.build(spec);
        debug!(
            filter = filter.name(),
            frame_count = channels.len(),
            sampling_rate,
            "conditioning green channel"
        );

        let green = filter.apply(&normalize(&channels.green));

        let cardiac = CardiacAnalyzer::new(&self.config);
        let beats = cardiac.detect_beats(&green, sampling_rate)?;

        let (rmssd, hrv_confidence, hrv_detail) = cardiac.hrv(&beats);
        let spectral_heart_rate = if is_flat(&green) {
            None
        } else {
            cardiac.spectral_bpm(&green, sampling_rate)
        };
        let (spo2, oximetry) = self.spo2_metric(channels, &*filter, sampling_rate);

        Ok(PulseMetrics {
            heart_rate: cardiac.heart_rate_metric(&beats, filter.name()),
            hrv: VitalMetric::measured(rmssd, "ms", hrv_confidence, HRV_METHODOLOGY),
            hrv_detail: Some(hrv_detail),
            spo2,
            oximetry,
            blood_pressure: blood_pressure_metric(&beats.peak_values),
            signal_quality: cardiac.signal_quality(&beats),
            spectral_heart_rate,
            peaks: beats.peaks.len(),
        })
    }

    fn spo2_metric(
        &self,
        channels: &ChannelSeries,
        filter: &dyn BandpassFilter,
        sampling_rate: f64,
    ) -> (VitalMetric, Option<OximetryDetail>) {
        match Spo2Estimator::new(&self.config).estimate(channels, filter, sampling_rate) {
            Ok(reading) => {
                if !reading.detail.in_physiological_range {
                    warn!(ratio = reading.detail.ratio, "SpO2 ratio outside physiological range");
                }
                (
                    VitalMetric::measured(reading.spo2, "%", reading.confidence, spo2::METHODOLOGY),
                    Some(reading.detail),
                )
            }
            Err(e) => {
                warn!(error = %e, "SpO2 estimation failed");
                (VitalMetric::failed("%", spo2::METHODOLOGY, &e), None)
            }
        }
    }
}

/// Estimate vital signs with the default configuration
pub fn estimate_vitals(
    frames: Vec<VideoFrame>,
    sampling_rate: f64,
) -> Result<VitalsBundle, VitalsError> {
    VitalsEngine::default().estimate_vitals(frames, sampling_rate)
}

fn check_sampling_rate(sampling_rate: f64) -> Result<(), VitalsError> {
    if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
        return Err(SignalError::InvalidSamplingRate(sampling_rate).into());
    }
    Ok(())
}

fn scored(metric: &VitalMetric) -> ScoredInput {
    metric.value.map(|v| (v, metric.confidence))
}

fn log_failure<T>(name: &str, metric: &VitalMetric<T>) {
    if let Some(error) = &metric.error {
        warn!(metric = name, %error, "metric unavailable");
    }
}

fn log_summary(bundle: &VitalsBundle, peaks: usize) {
    let quality = &bundle.signal_quality;
    let overall = bundle.overall_confidence();
    info!(
        frames = bundle.frame_count,
        peaks,
        heart_rate = ?bundle.heart_rate.value,
        spo2 = ?bundle.spo2.value,
        respiratory_rate = ?bundle.respiratory_rate.value,
        snr = quality.signal_to_noise,
        overall = %overall.level,
        "vitals estimated"
    );
    if quality.quality == QualityLevel::Poor && overall.level == Confidence::Low {
        warn!("cardiac signal quality is poor; estimates are unreliable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine_samples(n: usize, fs: f64) -> Vec<FrameSample> {
        (0..n)
            .map(|i| {
                let w = (2.0 * PI * 1.2 * i as f64 / fs).sin();
                FrameSample::new(i as u64, [150.0 + 2.0 * w, 120.0 + 4.0 * w, 100.0 + 1.0 * w])
            })
            .collect()
    }

    #[test]
    fn test_rejects_bad_sampling_rate() {
        let engine = VitalsEngine::default();
        let err = engine.estimate_from_signals(&sine_samples(10, 5.0), &[0.0; 9], 0.0).unwrap_err();
        assert_eq!(err, VitalsError::Signal(SignalError::InvalidSamplingRate(0.0)));
    }

    #[test]
    fn test_min_frames_enforced() {
        let engine = VitalsEngine::new(EngineConfig::strict()).unwrap();
        let err = engine.estimate_from_signals(&sine_samples(10, 5.0), &[0.0; 9], 5.0).unwrap_err();
        assert_eq!(err, VitalsError::InsufficientData { needed: 30, got: 10 });
    }

    #[test]
    fn test_out_of_order_samples_rejected() {
        let mut samples = sine_samples(10, 5.0);
        samples.swap(3, 4);
        let err = VitalsEngine::default()
            .estimate_from_signals(&samples, &[0.0; 9], 5.0)
            .unwrap_err();
        assert!(matches!(err, VitalsError::Frame(_)));
    }

    #[test]
    fn test_metric_isolation_on_flat_motion() {
        let bundle = VitalsEngine::default()
            .estimate_from_signals(&sine_samples(100, 5.0), &[0.0; 99], 5.0)
            .unwrap();
        assert!(bundle.respiratory_rate.value.is_none());
        assert!(bundle.heart_rate.value.is_some());
        assert!(bundle.hrv.value.is_some());
        // stress falls back to HRV alone
        assert!(bundle.stress.value.is_some());
        assert_eq!(bundle.stress.confidence, Confidence::Low);
        assert_eq!(bundle.mood.value, Some(crate::types::Mood::Calm));
    }

    #[test]
    fn test_band_above_nyquist_fails_only_pulse_metrics() {
        // 0.5 Hz lower edge is at Nyquist for 1 FPS
        let motion: Vec<f64> = (0..59)
            .map(|i| 0.05 + 0.04 * (2.0 * PI * 0.1 * i as f64).sin())
            .collect();
        let bundle = VitalsEngine::default()
            .estimate_from_signals(&sine_samples(60, 1.0), &motion, 1.0)
            .unwrap();

        assert!(bundle.heart_rate.value.is_none());
        assert!(bundle.heart_rate.error.as_deref().unwrap().contains("Invalid band"));
        assert!(bundle.heart_rate.methodology.contains("moving-average"));
        assert!(bundle.hrv.value.is_none());
        assert!(bundle.spo2.value.is_none());
        assert!(bundle.blood_pressure.value.is_none());
        assert!(bundle.hrv_detail.is_none());
        assert_eq!(bundle.signal_quality.quality, QualityLevel::Poor);

        assert!(bundle.respiratory_rate.value.is_some());
        assert!(bundle.mood.value.is_some());
        // stress from respiration alone
        assert!(bundle.stress.value.is_some());
        assert_eq!(bundle.stress.confidence, Confidence::Low);
        assert_eq!(bundle.frame_count, 60);
    }

    #[test]
    fn test_heart_rate_methodology_names_filter() {
        let bundle = VitalsEngine::default()
            .estimate_from_signals(&sine_samples(100, 5.0), &[0.0; 99], 5.0)
            .unwrap();
        assert!(bundle.heart_rate.methodology.contains("moving-average"));
        assert_eq!(bundle.heart_rate.value, Some(72.0));
    }
}

//! Vital-sign result types

use crate::quality::{overall_confidence, OverallConfidence};
use crate::VitalsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level confidence attached to every metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

impl Confidence {
    /// Bucket a score: `> high` is high, `> moderate` is moderate, anything
    /// else (including NaN) is low.
    pub fn from_score(score: f64, high: f64, moderate: f64) -> Self {
        if score > high {
            Confidence::High
        } else if score > moderate {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    /// Weight used when averaging confidences
    pub fn weight(self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Moderate => 0.6,
            Confidence::Low => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Moderate => "moderate",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One estimated vital sign.
///
/// `value: None` means the measurement failed; it is never a stand-in for zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalMetric<T = f64> {
    pub value: Option<T>,
    pub unit: String,
    pub confidence: Confidence,
    pub methodology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> VitalMetric<T> {
    pub fn measured(
        value: T,
        unit: impl Into<String>,
        confidence: Confidence,
        methodology: impl Into<String>,
    ) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
            confidence,
            methodology: methodology.into(),
            error: None,
        }
    }

    pub fn failed(unit: impl Into<String>, methodology: impl Into<String>, err: &VitalsError) -> Self {
        Self {
            value: None,
            unit: unit.into(),
            confidence: Confidence::Low,
            methodology: methodology.into(),
            error: Some(err.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }
}

/// Blood pressure pair in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Five-band stress classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StressLabel {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl StressLabel {
    /// Breakpoints at 20/40/60/80
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            StressLabel::VeryLow
        } else if score < 40.0 {
            StressLabel::Low
        } else if score < 60.0 {
            StressLabel::Moderate
        } else if score < 80.0 {
            StressLabel::High
        } else {
            StressLabel::VeryHigh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StressLabel::VeryLow => "very low",
            StressLabel::Low => "low",
            StressLabel::Moderate => "moderate",
            StressLabel::High => "high",
            StressLabel::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for StressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stress score (0-100) with its label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressLevel {
    pub score: f64,
    pub label: StressLabel,
}

/// Coarse motion-derived mood category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Active,
    Stressed,
    Neutral,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Active => "active",
            Mood::Stressed => "stressed",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Good,
    Poor,
}

/// Cardiac-channel quality, shared by the report's reliability section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalQuality {
    pub signal_to_noise: f64,
    pub quality: QualityLevel,
    pub confidence: Confidence,
}

/// Supplementary heart-rate-variability statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrvDetail {
    pub rmssd_ms: f64,
    pub sdnn_ms: f64,
    pub mean_interval_ms: f64,
    pub interval_count: usize,
}

/// Intermediate values behind the SpO2 estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OximetryDetail {
    pub ratio: f64,
    pub amplitude_ratio: f64,
    pub area_ratio: f64,
    pub perfusion_index: f64,
    pub quality_score: f64,
    pub in_physiological_range: bool,
}

/// Every metric from one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsBundle {
    pub heart_rate: VitalMetric,
    pub hrv: VitalMetric,
    pub respiratory_rate: VitalMetric,
    pub spo2: VitalMetric,
    pub blood_pressure: VitalMetric<BloodPressure>,
    pub stress: VitalMetric<StressLevel>,
    pub mood: VitalMetric<Mood>,
    pub signal_quality: SignalQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hrv_detail: Option<HrvDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oximetry: Option<OximetryDetail>,
    /// Dominant in-band frequency of the cardiac channel, in bpm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectral_heart_rate: Option<f64>,
    pub frame_count: usize,
    pub sampling_rate: f64,
}

impl VitalsBundle {
    /// Confidence of the six primary metrics
    pub fn primary_confidences(&self) -> [Confidence; 6] {
        [
            self.heart_rate.confidence,
            self.hrv.confidence,
            self.respiratory_rate.confidence,
            self.spo2.confidence,
            self.blood_pressure.confidence,
            self.stress.confidence,
        ]
    }

    pub fn overall_confidence(&self) -> OverallConfidence {
        overall_confidence(&self.primary_confidences())
    }

    pub fn recording_seconds(&self) -> f64 {
        if self.sampling_rate > 0.0 {
            self.frame_count as f64 / self.sampling_rate
        } else {
            0.0
        }
    }
}

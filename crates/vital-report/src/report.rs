//! Report assembly
//!
//! Pure lookup and text composition over a [`VitalsBundle`]. No signal
//! processing happens here and the same bundle and context always produce
//! the same report.

use crate::ranges::{OxygenStatus, Range, ReferenceRanges, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vitals_engine::{
    BloodPressure, Confidence, Mood, SignalQuality, StressLabel, StressLevel, VitalMetric,
    VitalsBundle, ENGINE_VERSION,
};

/// Recordings shorter than this get an accuracy caveat
const SHORT_RECORDING_SECS: f64 = 30.0;

pub const STATUS_HEALTHY: &str = "Healthy";
pub const STATUS_ATTENTION: &str = "Attention Recommended";
pub const STATUS_MEDICAL: &str = "Medical Attention Advised";
pub const STATUS_INCONCLUSIVE: &str = "Inconclusive";

const FIXED_LIMITATIONS: [&str; 4] = [
    "SpO2 is estimated from a synthetic infrared channel (0.6 red + 0.4 blue) and is experimental",
    "Blood pressure is a heuristic mapping of pulse amplitude, not a cuff measurement",
    "Mood is a coarse motion-energy heuristic, not a learned classifier",
    "These estimates are for wellness information only and are not a medical diagnosis",
];

/// Self-reported quality of the source video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    Low,
    #[default]
    Medium,
    High,
}

/// Context supplied alongside the frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingContext {
    pub duration_seconds: f64,
    pub video_quality: VideoQuality,
    pub timestamp: DateTime<Utc>,
}

impl RecordingContext {
    /// Context stamped with the current time
    pub fn now(duration_seconds: f64, video_quality: VideoQuality) -> Self {
        Self {
            duration_seconds,
            video_quality,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub timestamp: DateTime<Utc>,
    pub duration_seconds: f64,
    pub video_quality: VideoQuality,
    pub frame_count: usize,
    pub sampling_rate: f64,
    pub engine_version: String,
}

/// One metric rendered with its status and reference range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedMetric<V, S = Status> {
    pub value: Option<V>,
    pub unit: String,
    pub status: S,
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<String>,
    pub confidence: Confidence,
    pub methodology: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedVitals {
    pub heart_rate: ReportedMetric<f64>,
    pub hrv: ReportedMetric<f64>,
    pub respiratory_rate: ReportedMetric<f64>,
    pub spo2: ReportedMetric<f64, OxygenStatus>,
    pub blood_pressure: ReportedMetric<BloodPressure>,
    pub stress: ReportedMetric<StressLevel>,
    pub mood: ReportedMetric<Mood>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub overall_status: String,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reliability {
    pub overall_confidence: Confidence,
    pub confidence_score: f64,
    pub signal_quality: SignalQuality,
    pub limitations: Vec<String>,
}

/// Final user-facing report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalReport {
    pub metadata: ReportMetadata,
    pub vitals: ReportedVitals,
    pub analysis: Analysis,
    pub reliability: Reliability,
}

impl VitalReport {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build a report with the default reference ranges
pub fn assemble_report(bundle: &VitalsBundle, context: &RecordingContext) -> VitalReport {
    ReportAssembler::default().assemble(bundle, context)
}

/// Maps bundles to reports against a set of reference ranges
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    ranges: ReferenceRanges,
}

impl ReportAssembler {
    pub fn new(ranges: ReferenceRanges) -> Self {
        Self { ranges }
    }

    pub fn assemble(&self, bundle: &VitalsBundle, context: &RecordingContext) -> VitalReport {
        let vitals = self.render_vitals(bundle);
        let (concerns, recommendations) = self.findings(&vitals);

        let overall_status = if !any_measured(&vitals) {
            STATUS_INCONCLUSIVE
        } else if concerns.is_empty() {
            STATUS_HEALTHY
        } else if vitals.spo2.status.needs_attention() {
            STATUS_MEDICAL
        } else {
            STATUS_ATTENTION
        };

        let overall = bundle.overall_confidence();
        let limitations = limitations(bundle, context);
        debug!(
            concerns = concerns.len(),
            limitations = limitations.len(),
            "report findings composed"
        );

        let report = VitalReport {
            metadata: ReportMetadata {
                timestamp: context.timestamp,
                duration_seconds: context.duration_seconds,
                video_quality: context.video_quality,
                frame_count: bundle.frame_count,
                sampling_rate: bundle.sampling_rate,
                engine_version: ENGINE_VERSION.to_string(),
            },
            analysis: Analysis {
                summary: summary(&vitals, overall.level),
                overall_status: overall_status.to_string(),
                concerns,
                recommendations,
            },
            reliability: Reliability {
                overall_confidence: overall.level,
                confidence_score: overall.score,
                signal_quality: bundle.signal_quality,
                limitations,
            },
            vitals,
        };

        info!(
            status = %report.analysis.overall_status,
            confidence = %report.reliability.overall_confidence,
            "report assembled"
        );
        report
    }

    fn render_vitals(&self, bundle: &VitalsBundle) -> ReportedVitals {
        let r = &self.ranges;

        let hr_status = r.heart_rate.classify(bundle.heart_rate.value);
        let hrv_status = r.hrv.classify(bundle.hrv.value);
        let rr_status = r.respiratory_rate.classify(bundle.respiratory_rate.value);
        let spo2_status = r.oxygen_status(bundle.spo2.value);

        let bp = bundle.blood_pressure.value;
        let bp_status = r.blood_pressure_status(bp.map(|p| p.systolic), bp.map(|p| p.diastolic));

        let stress_status = match bundle.stress.value.map(|s| s.label) {
            None => Status::Unknown,
            Some(StressLabel::High | StressLabel::VeryHigh) => Status::High,
            Some(_) => Status::Normal,
        };
        let mood_status = if bundle.mood.is_available() {
            Status::Normal
        } else {
            Status::Unknown
        };

        ReportedVitals {
            heart_rate: reported(
                &bundle.heart_rate,
                hr_status,
                interpret_status("Heart rate", hr_status, "resting"),
                Some(&r.heart_rate),
            ),
            hrv: reported(
                &bundle.hrv,
                hrv_status,
                interpret_status("Heart rate variability", hrv_status, "adult"),
                Some(&r.hrv),
            ),
            respiratory_rate: reported(
                &bundle.respiratory_rate,
                rr_status,
                interpret_status("Respiratory rate", rr_status, "resting"),
                Some(&r.respiratory_rate),
            ),
            spo2: ReportedMetric {
                value: bundle.spo2.value,
                unit: bundle.spo2.unit.clone(),
                status: spo2_status,
                interpretation: interpret_oxygen(spo2_status).to_string(),
                normal_range: Some(format!(">= {} %", r.spo2_normal)),
                confidence: bundle.spo2.confidence,
                methodology: bundle.spo2.methodology.clone(),
            },
            blood_pressure: ReportedMetric {
                value: bp,
                unit: bundle.blood_pressure.unit.clone(),
                status: bp_status,
                interpretation: interpret_status("Estimated blood pressure", bp_status, "adult"),
                normal_range: Some(format!(
                    "{}-{}/{}-{} mmHg",
                    r.systolic.min, r.systolic.max, r.diastolic.min, r.diastolic.max
                )),
                confidence: bundle.blood_pressure.confidence,
                methodology: bundle.blood_pressure.methodology.clone(),
            },
            stress: reported(
                &bundle.stress,
                stress_status,
                match bundle.stress.value {
                    Some(level) => format!("Stress level is {}", level.label),
                    None => "Measurement failed".to_string(),
                },
                None,
            ),
            mood: reported(
                &bundle.mood,
                mood_status,
                match bundle.mood.value {
                    Some(mood) => format!("Movement pattern suggests a {mood} state"),
                    None => "Measurement failed".to_string(),
                },
                None,
            ),
        }
    }

    /// Table-driven concerns and matching recommendations
    fn findings(&self, vitals: &ReportedVitals) -> (Vec<String>, Vec<String>) {
        let mut concerns = Vec::new();
        let mut recommendations = Vec::new();
        let mut add = |concern: &str, recommendation: &str| {
            concerns.push(concern.to_string());
            recommendations.push(recommendation.to_string());
        };

        match vitals.heart_rate.status {
            Status::Low => add(
                "Heart rate below the typical resting range",
                "Consult a healthcare provider if you experience dizziness or fatigue",
            ),
            Status::High => add(
                "Heart rate above the typical resting range",
                "Rest for a few minutes and re-measure; seek advice if it stays elevated",
            ),
            _ => {}
        }

        match vitals.hrv.status {
            Status::Low => add(
                "Low heart rate variability",
                "Prioritize sleep, recovery, and stress management",
            ),
            Status::High => add(
                "Unusually high heart rate variability, possibly a measurement artifact",
                "Re-measure in steady lighting while keeping still",
            ),
            _ => {}
        }

        match vitals.respiratory_rate.status {
            Status::Low => add(
                "Respiratory rate below the typical resting range",
                "Re-measure while breathing normally",
            ),
            Status::High => add(
                "Respiratory rate above the typical resting range",
                "Try slow, controlled breathing and re-measure",
            ),
            _ => {}
        }

        match vitals.spo2.status {
            OxygenStatus::Mild => add(
                "Mildly reduced blood oxygen saturation",
                "Re-measure with a clinical pulse oximeter",
            ),
            OxygenStatus::Moderate | OxygenStatus::Severe => add(
                "Low blood oxygen saturation",
                "Seek medical attention and confirm with a clinical pulse oximeter",
            ),
            _ => {}
        }

        match vitals.blood_pressure.status {
            Status::Low => add(
                "Estimated blood pressure below the typical range",
                "Confirm with a validated blood pressure cuff",
            ),
            Status::High => add(
                "Estimated blood pressure above the typical range",
                "Confirm with a validated blood pressure cuff",
            ),
            _ => {}
        }

        if vitals.stress.status == Status::High {
            add(
                "Elevated stress indicators",
                "Take a short break and try relaxation or breathing exercises",
            );
        }

        (concerns, recommendations)
    }
}

fn reported<V: Clone>(
    metric: &VitalMetric<V>,
    status: Status,
    interpretation: String,
    range: Option<&Range>,
) -> ReportedMetric<V> {
    ReportedMetric {
        value: metric.value.clone(),
        unit: metric.unit.clone(),
        status,
        interpretation,
        normal_range: range.map(|r| r.describe(&metric.unit)),
        confidence: metric.confidence,
        methodology: metric.methodology.clone(),
    }
}

fn interpret_status(name: &str, status: Status, population: &str) -> String {
    match status {
        Status::Low => format!("{name} is below the typical {population} range"),
        Status::Normal => format!("{name} is within the typical {population} range"),
        Status::High => format!("{name} is above the typical {population} range"),
        Status::Unknown => "Measurement failed".to_string(),
    }
}

fn interpret_oxygen(status: OxygenStatus) -> &'static str {
    match status {
        OxygenStatus::Normal => "Blood oxygen saturation is normal",
        OxygenStatus::Mild => "Mild desaturation",
        OxygenStatus::Moderate => "Moderate desaturation",
        OxygenStatus::Severe => "Severe desaturation",
        OxygenStatus::Unknown => "Measurement failed",
    }
}

fn any_measured(vitals: &ReportedVitals) -> bool {
    vitals.heart_rate.value.is_some()
        || vitals.hrv.value.is_some()
        || vitals.respiratory_rate.value.is_some()
        || vitals.spo2.value.is_some()
        || vitals.blood_pressure.value.is_some()
        || vitals.stress.value.is_some()
}

fn summary(vitals: &ReportedVitals, overall: Confidence) -> String {
    let mut parts = Vec::new();
    if let Some(v) = vitals.heart_rate.value {
        parts.push(format!("heart rate {v:.0} bpm"));
    }
    if let Some(v) = vitals.spo2.value {
        parts.push(format!("SpO2 {v:.0}%"));
    }
    if let Some(v) = vitals.respiratory_rate.value {
        parts.push(format!("respiratory rate {v:.0} breaths/min"));
    }
    if let Some(v) = vitals.hrv.value {
        parts.push(format!("HRV {v:.0} ms"));
    }

    if parts.is_empty() {
        return "No vital signs could be measured from this recording.".to_string();
    }
    format!("Measured {}. Overall confidence: {overall}.", parts.join(", "))
}

fn limitations(bundle: &VitalsBundle, context: &RecordingContext) -> Vec<String> {
    let mut out: Vec<String> = FIXED_LIMITATIONS.iter().map(|s| s.to_string()).collect();

    let failures = [
        ("Heart rate", bundle.heart_rate.error.as_deref()),
        ("Heart rate variability", bundle.hrv.error.as_deref()),
        ("Respiratory rate", bundle.respiratory_rate.error.as_deref()),
        ("SpO2", bundle.spo2.error.as_deref()),
        ("Blood pressure", bundle.blood_pressure.error.as_deref()),
        ("Stress", bundle.stress.error.as_deref()),
        ("Mood", bundle.mood.error.as_deref()),
    ];
    for (name, error) in failures {
        if let Some(error) = error {
            out.push(format!("{name} could not be measured: {error}"));
        }
    }

    if bundle.signal_quality.confidence == Confidence::Low {
        out.push("Cardiac signal quality is poor; values may be unreliable".to_string());
    }
    if context.video_quality == VideoQuality::Low {
        out.push("Low video quality reduces measurement accuracy".to_string());
    }
    if context.duration_seconds < SHORT_RECORDING_SECS {
        out.push(format!(
            "Recordings shorter than {SHORT_RECORDING_SECS:.0} seconds limit HRV and respiratory accuracy"
        ));
    }

    out
}

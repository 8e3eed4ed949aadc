//! Reference ranges and status classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a value relative to its reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Low,
    Normal,
    High,
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Low => "low",
            Status::Normal => "normal",
            Status::High => "high",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blood-oxygen saturation bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OxygenStatus {
    Normal,
    Mild,
    Moderate,
    Severe,
    Unknown,
}

impl OxygenStatus {
    /// Moderate or severe desaturation
    pub fn needs_attention(self) -> bool {
        matches!(self, OxygenStatus::Moderate | OxygenStatus::Severe)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OxygenStatus::Normal => "normal",
            OxygenStatus::Mild => "mild",
            OxygenStatus::Moderate => "moderate",
            OxygenStatus::Severe => "severe",
            OxygenStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OxygenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `None` (failed measurement) is unknown, never low
    pub fn classify(&self, value: Option<f64>) -> Status {
        match value {
            None => Status::Unknown,
            Some(v) if v.is_nan() => Status::Unknown,
            Some(v) if v < self.min => Status::Low,
            Some(v) if v > self.max => Status::High,
            Some(_) => Status::Normal,
        }
    }

    pub fn describe(&self, unit: &str) -> String {
        format!("{}-{} {}", self.min, self.max, unit)
    }
}

/// Adult resting reference ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRanges {
    pub heart_rate: Range,
    pub hrv: Range,
    pub respiratory_rate: Range,
    pub systolic: Range,
    pub diastolic: Range,
    /// SpO2 at or above this is normal
    pub spo2_normal: f64,
    /// At or above this (below normal) is mild desaturation
    pub spo2_mild: f64,
    /// At or above this (below mild) is moderate; lower is severe
    pub spo2_moderate: f64,
}

impl Default for ReferenceRanges {
    fn default() -> Self {
        Self {
            heart_rate: Range::new(60.0, 100.0),
            hrv: Range::new(20.0, 200.0),
            respiratory_rate: Range::new(12.0, 20.0),
            systolic: Range::new(90.0, 140.0),
            diastolic: Range::new(60.0, 90.0),
            spo2_normal: 95.0,
            spo2_mild: 90.0,
            spo2_moderate: 85.0,
        }
    }
}

impl ReferenceRanges {
    pub fn oxygen_status(&self, spo2: Option<f64>) -> OxygenStatus {
        match spo2 {
            None => OxygenStatus::Unknown,
            Some(v) if v.is_nan() => OxygenStatus::Unknown,
            Some(v) if v >= self.spo2_normal => OxygenStatus::Normal,
            Some(v) if v >= self.spo2_mild => OxygenStatus::Mild,
            Some(v) if v >= self.spo2_moderate => OxygenStatus::Moderate,
            Some(_) => OxygenStatus::Severe,
        }
    }

    /// Worse of the systolic and diastolic statuses; high outranks low
    pub fn blood_pressure_status(&self, systolic: Option<f64>, diastolic: Option<f64>) -> Status {
        let s = self.systolic.classify(systolic);
        let d = self.diastolic.classify(diastolic);
        match (s, d) {
            (Status::High, _) | (_, Status::High) => Status::High,
            (Status::Low, _) | (_, Status::Low) => Status::Low,
            (Status::Unknown, _) | (_, Status::Unknown) => Status::Unknown,
            _ => Status::Normal,
        }
    }
}

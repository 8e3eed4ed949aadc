//! rPPG Vital-Sign Engine
//!
//! Estimates vital signs from an ordered sequence of face-video frames:
//! - Heart rate and HRV (RMSSD) from green-channel peak timing
//! - Respiratory rate from whole-frame motion energy
//! - SpO2 by ratio of ratios on red and a synthetic infrared channel
//! - Blood pressure, stress, and mood from fixed heuristic tables
//!
//! Every metric carries a confidence level. A metric that cannot be
//! computed is reported with a `null` value instead of failing the run.

pub mod cardiac;
pub mod config;
pub mod engine;
pub mod heuristics;
pub mod quality;
pub mod respiratory;
pub mod spo2;
pub mod types;

pub use config::EngineConfig;
pub use engine::{estimate_vitals, VitalsEngine};
pub use quality::{overall_confidence, OverallConfidence};
pub use spo2::calibrated_spo2;
pub use types::{
    BloodPressure, Confidence, HrvDetail, Mood, OximetryDetail, QualityLevel, SignalQuality,
    StressLabel, StressLevel, VitalMetric, VitalsBundle,
};

pub use frame_capture::{FrameSample, VideoFrame};
pub use signal_conditioning::FilterKind;

use frame_capture::FrameError;
use signal_conditioning::SignalError;
use thiserror::Error;

/// Version stamped into reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vital-sign estimation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VitalsError {
    #[error("Insufficient data: need at least {needed} samples, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Degenerate signal: {0}")]
    DegenerateSignal(&'static str),

    #[error("Ratio of ratios {ratio} cannot be calibrated")]
    OutOfRangeCalibration { ratio: f64 },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("Configuration error: {0}")]
    Config(String),
}

//! Vital-Sign Report Assembly
//!
//! Turns a [`vitals_engine::VitalsBundle`] plus recording context into a
//! user-facing report:
//! - Per-metric status against fixed adult reference ranges
//! - Table-driven concerns and recommendations
//! - Reliability section with overall confidence and limitations

pub mod ranges;
pub mod report;

pub use ranges::{OxygenStatus, Range, ReferenceRanges, Status};
pub use report::{
    assemble_report, Analysis, RecordingContext, Reliability, ReportAssembler, ReportMetadata,
    ReportedMetric, ReportedVitals, VideoQuality, VitalReport,
};

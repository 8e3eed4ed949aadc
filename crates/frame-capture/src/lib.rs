//! Frame Capture Library for rPPG Vital Signs
//!
//! Owns the decoded frame buffers handed over by the video collaborator.
//! Supports:
//! - Validated RGB(A) frame buffers with crop/grayscale helpers
//! - Per-frame channel-mean reduction into ordered RGB samples
//! - Whole-frame motion energy for respiratory analysis

pub mod frame;
pub mod motion;
pub mod reducer;

pub use frame::{decode_image, VideoFrame};
pub use motion::motion_energy;
pub use reducer::{ensure_ordered, reduce_frames, ChannelSeries, FrameSample};

use thiserror::Error;

/// Frame error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Failed to decode frame {index}: {reason}")]
    Decode { index: u64, reason: String },

    #[error("Frame {index} buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer {
        index: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Frame {index} has {channels} channels, at least 3 required")]
    TooFewChannels { index: u64, channels: usize },

    #[error("Frame {index} has no pixels")]
    Empty { index: u64 },

    #[error("Frames out of order: {next} follows {previous}")]
    OutOfOrder { previous: u64, next: u64 },

    #[error("Frame {index} shape differs from the previous frame")]
    ShapeMismatch { index: u64 },
}

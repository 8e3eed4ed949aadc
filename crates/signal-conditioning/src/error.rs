//! Signal Error Types

use thiserror::Error;

/// Errors raised while conditioning a series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Band edges are inverted, negative, or above Nyquist
    #[error("Invalid band [{low_hz}, {high_hz}] Hz at {sampling_rate} Hz sampling")]
    InvalidBand {
        low_hz: f64,
        high_hz: f64,
        sampling_rate: f64,
    },

    /// Sampling rate is not a positive finite number
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    /// Filter order must be at least one
    #[error("Filter order must be >= 1")]
    InvalidOrder,
}

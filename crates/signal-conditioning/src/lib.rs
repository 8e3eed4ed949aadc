//! Signal Conditioning
//!
//! Pure numeric building blocks shared by every vital-sign analyzer:
//! statistics, z-score normalization, band-limiting filters, peak/trough
//! detection, and a spectral cross-check.

mod error;
pub mod filter;
pub mod normalize;
pub mod peaks;
pub mod spectrum;
pub mod stats;

pub use error::SignalError;
pub use filter::{
    bandpass, moving_average, BandSpec, BandpassFilter, BiquadBandpass, FilterKind,
    MovingAverageBandpass,
};
pub use normalize::normalize;
pub use peaks::{find_peaks, find_troughs, peaks_above, values_at};
pub use spectrum::SpectralAnalyzer;

//! Band-limiting filters
//!
//! Callers go through [`BandpassFilter`] so the provisional moving-average
//! baseline can be swapped for a real IIR bandpass without changing them.

use crate::SignalError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Passband and sampling parameters for a bandpass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub low_hz: f64,
    pub high_hz: f64,
    pub sampling_rate: f64,
    pub order: usize,
}

impl BandSpec {
    /// Create a validated band specification
    pub fn new(
        low_hz: f64,
        high_hz: f64,
        sampling_rate: f64,
        order: usize,
    ) -> Result<Self, SignalError> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(SignalError::InvalidSamplingRate(sampling_rate));
        }
        if order == 0 {
            return Err(SignalError::InvalidOrder);
        }
        let band_ok = low_hz.is_finite()
            && high_hz.is_finite()
            && low_hz >= 0.0
            && low_hz < high_hz
            && low_hz < sampling_rate / 2.0;
        if !band_ok {
            return Err(SignalError::InvalidBand {
                low_hz,
                high_hz,
                sampling_rate,
            });
        }

        Ok(Self {
            low_hz,
            high_hz,
            sampling_rate,
            order,
        })
    }

    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }
}

/// A filter restricting a series to a frequency band.
///
/// Output length always equals input length.
pub trait BandpassFilter: Send + Sync {
    fn apply(&self, signal: &[f64]) -> Vec<f64>;

    /// Short identifier used in methodology strings
    fn name(&self) -> &'static str;
}

/// Which bandpass implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    MovingAverage,
    Biquad,
}

impl FilterKind {
    pub fn build(self, spec: BandSpec) -> Box<dyn BandpassFilter> {
        match self {
            FilterKind::MovingAverage => Box::new(MovingAverageBandpass::new(spec)),
            FilterKind::Biquad => Box::new(BiquadBandpass::new(spec)),
        }
    }

    /// Same identifier the built filter reports
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::MovingAverage => "moving-average",
            FilterKind::Biquad => "biquad",
        }
    }
}

/// Causal trailing mean; the first samples average over what is available
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(series.len());
    let mut sum = 0.0;
    for (i, &v) in series.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= series[i - window];
        }
        out.push(sum / (i + 1).min(window) as f64);
    }
    out
}

/// Provisional baseline: smoothing with a trailing window of `order` samples.
///
/// This only suppresses high-frequency noise; it does not remove content
/// below `low_hz` and is not a faithful bandpass.
#[derive(Debug, Clone)]
pub struct MovingAverageBandpass {
    spec: BandSpec,
}

impl MovingAverageBandpass {
    pub fn new(spec: BandSpec) -> Self {
        Self { spec }
    }
}

impl BandpassFilter for MovingAverageBandpass {
    fn apply(&self, signal: &[f64]) -> Vec<f64> {
        moving_average(signal, self.spec.order)
    }

    fn name(&self) -> &'static str {
        "moving-average"
    }
}

/// Second-order section (direct form I)
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    const Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn high_pass(cutoff_hz: f64, sampling_rate: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sampling_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * Self::Q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos) / 2.0 / a0,
            b1: -(1.0 + cos) / a0,
            b2: (1.0 + cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn low_pass(cutoff_hz: f64, sampling_rate: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sampling_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * Self::Q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos) / 2.0 / a0,
            b1: (1.0 - cos) / a0,
            b2: (1.0 - cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn run(&self, input: &[f64]) -> Vec<f64> {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);
        input
            .iter()
            .map(|&x| {
                let y = self.b0 * x + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
                x2 = x1;
                x1 = x;
                y2 = y1;
                y1 = y;
                y
            })
            .collect()
    }
}

/// Cascaded Butterworth-style biquads: `order / 2` high-pass and
/// low-pass sections (at least one each).
#[derive(Debug, Clone)]
pub struct BiquadBandpass {
    sections: Vec<Biquad>,
}

impl BiquadBandpass {
    /// Upper edge is clamped to this fraction of the sampling rate
    const MAX_HIGH_FRACTION: f64 = 0.45;

    pub fn new(spec: BandSpec) -> Self {
        let stages = (spec.order / 2).max(1);
        let mut sections = Vec::with_capacity(stages * 2);

        if spec.low_hz > 0.0 {
            sections.extend((0..stages).map(|_| Biquad::high_pass(spec.low_hz, spec.sampling_rate)));
        }
        // An upper edge at or past Nyquist leaves nothing to cut
        if spec.high_hz < spec.nyquist() {
            let high = spec.high_hz.min(spec.sampling_rate * Self::MAX_HIGH_FRACTION);
            sections.extend((0..stages).map(|_| Biquad::low_pass(high, spec.sampling_rate)));
        }

        Self { sections }
    }
}

impl BandpassFilter for BiquadBandpass {
    fn apply(&self, signal: &[f64]) -> Vec<f64> {
        self.sections
            .iter()
            .fold(signal.to_vec(), |acc, section| section.run(&acc))
    }

    fn name(&self) -> &'static str {
        "biquad"
    }
}

/// Band-limit a series to `[low_hz, high_hz]` with the baseline filter
pub fn bandpass(
    signal: &[f64],
    low_hz: f64,
    high_hz: f64,
    sampling_rate: f64,
    order: usize,
) -> Result<Vec<f64>, SignalError> {
    let spec = BandSpec::new(low_hz, high_hz, sampling_rate, order)?;
    Ok(MovingAverageBandpass::new(spec).apply(signal))
}

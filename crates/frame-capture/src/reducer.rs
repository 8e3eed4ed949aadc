//! Frame-to-signal reduction
//!
//! Each frame collapses to the arithmetic mean of its first three
//! channels. Frames are reduced in parallel and re-assembled in input
//! order; the result is rejected if indices are not strictly increasing.

use crate::frame::VideoFrame;
use crate::FrameError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mean RGB of one decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Capture-order index
    pub index: u64,
    /// Channel means (R, G, B) in [0, 255]
    pub rgb: [f64; 3],
}

impl FrameSample {
    pub fn new(index: u64, rgb: [f64; 3]) -> Self {
        Self { index, rgb }
    }

    /// Reduce a frame to its channel means
    pub fn from_frame(frame: &VideoFrame) -> Self {
        let mut sums = [0u64; 3];
        for pixel in frame.data().chunks_exact(frame.channels()) {
            sums[0] += u64::from(pixel[0]);
            sums[1] += u64::from(pixel[1]);
            sums[2] += u64::from(pixel[2]);
        }
        let n = frame.pixel_count() as f64;

        Self {
            index: frame.index(),
            rgb: sums.map(|s| s as f64 / n),
        }
    }

    pub fn red(&self) -> f64 {
        self.rgb[0]
    }

    pub fn green(&self) -> f64 {
        self.rgb[1]
    }

    pub fn blue(&self) -> f64 {
        self.rgb[2]
    }
}

/// Reduce an ordered frame sequence to RGB samples
pub fn reduce_frames(frames: &[VideoFrame]) -> Result<Vec<FrameSample>, FrameError> {
    let samples: Vec<FrameSample> = frames.par_iter().map(FrameSample::from_frame).collect();
    ensure_ordered(&samples)?;

    debug!("Reduced {} frames to RGB samples", samples.len());
    Ok(samples)
}

/// Reject samples whose indices are not strictly increasing
pub fn ensure_ordered(samples: &[FrameSample]) -> Result<(), FrameError> {
    match samples.windows(2).find(|w| w[1].index <= w[0].index) {
        Some(w) => Err(FrameError::OutOfOrder {
            previous: w[0].index,
            next: w[1].index,
        }),
        None => Ok(()),
    }
}

/// Per-channel scalar series extracted from ordered samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSeries {
    pub red: Vec<f64>,
    pub green: Vec<f64>,
    pub blue: Vec<f64>,
}

impl ChannelSeries {
    pub fn from_samples(samples: &[FrameSample]) -> Self {
        Self {
            red: samples.iter().map(FrameSample::red).collect(),
            green: samples.iter().map(FrameSample::green).collect(),
            blue: samples.iter().map(FrameSample::blue).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.green.len()
    }

    pub fn is_empty(&self) -> bool {
        self.green.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgb: [u8; 3], index: u64) -> VideoFrame {
        VideoFrame::rgb(rgb.repeat(4), 2, 2, index).unwrap()
    }

    #[test]
    fn test_channel_means() {
        let data = vec![10, 20, 30, 30, 40, 50];
        let frame = VideoFrame::rgb(data, 2, 1, 0).unwrap();
        let sample = FrameSample::from_frame(&frame);
        assert_eq!(sample.rgb, [20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_alpha_channel_ignored() {
        let data = vec![10, 20, 30, 255, 30, 40, 50, 0];
        let frame = VideoFrame::new(data, 2, 1, 4, 0).unwrap();
        assert_eq!(FrameSample::from_frame(&frame).rgb, [20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_order_preserved() {
        let frames: Vec<VideoFrame> = (0..64).map(|i| solid([i as u8, 0, 0], i)).collect();
        let samples = reduce_frames(&frames).unwrap();
        for (i, s) in samples.iter().enumerate() {
            assert_eq!(s.index, i as u64);
            assert_eq!(s.red(), i as f64);
        }
    }

    #[test]
    fn test_out_of_order_rejected() {
        let frames = vec![solid([0; 3], 0), solid([0; 3], 2), solid([0; 3], 1)];
        assert_eq!(
            reduce_frames(&frames).unwrap_err(),
            FrameError::OutOfOrder {
                previous: 2,
                next: 1
            }
        );
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let frames = vec![solid([0; 3], 3), solid([0; 3], 3)];
        assert!(reduce_frames(&frames).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_means_within_pixel_range(pixels in proptest::collection::vec(proptest::prelude::any::<u8>(), 3..300)) {
            let usable = pixels.len() / 3 * 3;
            let frame = VideoFrame::rgb(pixels[..usable].to_vec(), (usable / 3) as u32, 1, 0).unwrap();
            let sample = FrameSample::from_frame(&frame);
            for v in sample.rgb {
                proptest::prop_assert!((0.0..=255.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_channel_series_split() {
        let samples = vec![
            FrameSample::new(0, [1.0, 2.0, 3.0]),
            FrameSample::new(1, [4.0, 5.0, 6.0]),
        ];
        let series = ChannelSeries::from_samples(&samples);
        assert_eq!(series.red, vec![1.0, 4.0]);
        assert_eq!(series.green, vec![2.0, 5.0]);
        assert_eq!(series.blue, vec![3.0, 6.0]);
        assert_eq!(series.len(), 2);
    }
}

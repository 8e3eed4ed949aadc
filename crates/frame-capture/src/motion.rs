//! Whole-frame motion energy

use crate::frame::VideoFrame;
use crate::FrameError;
use ndarray::{ArrayView3, Zip};
use rayon::prelude::*;

fn view(frame: &VideoFrame) -> Result<ArrayView3<'_, u8>, FrameError> {
    ArrayView3::from_shape(
        (
            frame.height() as usize,
            frame.width() as usize,
            frame.channels(),
        ),
        frame.data(),
    )
    .map_err(|_| FrameError::ShapeMismatch {
        index: frame.index(),
    })
}

/// Mean absolute pixel difference between two frames, scaled to [0, 1]
fn frame_difference(prev: &VideoFrame, next: &VideoFrame) -> Result<f64, FrameError> {
    let a = view(prev)?;
    let b = view(next)?;
    if a.shape() != b.shape() {
        return Err(FrameError::ShapeMismatch {
            index: next.index(),
        });
    }

    let total = Zip::from(&a)
        .and(&b)
        .fold(0u64, |acc, &p, &n| acc + u64::from(p.abs_diff(n)));

    Ok(total as f64 / (a.len() as f64 * 255.0))
}

/// Motion-energy series, one element per consecutive frame pair
pub fn motion_energy(frames: &[VideoFrame]) -> Result<Vec<f64>, FrameError> {
    frames
        .par_windows(2)
        .map(|pair| frame_difference(&pair[0], &pair[1]))
        .collect()
}

//! Video frame types and processing

use crate::FrameError;
use image::DynamicImage;

/// Decoded video frame (interleaved, channel count >= 3, RGB order)
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Pixel data (width * height * channels)
    data: Vec<u8>,
    /// Frame width
    width: u32,
    /// Frame height
    height: u32,
    /// Interleaved channels per pixel
    channels: usize,
    /// Capture-order index (monotonically increasing)
    index: u64,
}

impl VideoFrame {
    /// Create a new video frame from raw interleaved data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: usize,
        index: u64,
    ) -> Result<Self, FrameError> {
        if channels < 3 {
            return Err(FrameError::TooFewChannels { index, channels });
        }
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { index });
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(FrameError::InvalidBuffer {
                index,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            channels,
            index,
        })
    }

    /// Create an RGB frame
    pub fn rgb(data: Vec<u8>, width: u32, height: u32, index: u64) -> Result<Self, FrameError> {
        Self::new(data, width, height, 3, index)
    }

    /// Convert a decoded still into an RGB frame
    pub fn from_image(img: &DynamicImage, index: u64) -> Result<Self, FrameError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::rgb(rgb.into_raw(), width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the channel values of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.channels;
        self.data.get(idx..idx + self.channels)
    }

    /// Crop a region of the frame (e.g. a face box from the detector)
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<VideoFrame> {
        if w == 0 || h == 0 || x.checked_add(w)? > self.width || y.checked_add(h)? > self.height {
            return None;
        }

        let row_len = w as usize * self.channels;
        let mut cropped = Vec::with_capacity(row_len * h as usize);
        for row in y..(y + h) {
            let start = (row as usize * self.width as usize + x as usize) * self.channels;
            cropped.extend_from_slice(&self.data[start..start + row_len]);
        }

        Some(VideoFrame {
            data: cropped,
            width: w,
            height: h,
            channels: self.channels,
            index: self.index,
        })
    }
}

/// Decode an encoded still (JPEG, PNG, ...) into an RGB frame
pub fn decode_image(bytes: &[u8], index: u64) -> Result<VideoFrame, FrameError> {
    let img = image::load_from_memory(bytes).map_err(|e| FrameError::Decode {
        index,
        reason: e.to_string(),
    })?;
    VideoFrame::from_image(&img, index)
}

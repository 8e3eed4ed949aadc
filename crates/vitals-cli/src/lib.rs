//! Frame-directory front end for the vital-sign engine
//!
//! Stands in for the video collaborator: reads still frames extracted from
//! a face video, drops the ones that fail to decode, and hands the rest to
//! the engine in file-name order.

use anyhow::{anyhow, bail, Context, Result};
use frame_capture::{decode_image, VideoFrame};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Initialize logging
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

/// Image files in `dir`, sorted by file name
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading frame directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Decode every frame in `dir`.
///
/// Each frame keeps its position in the listing as its index, so skipped
/// files leave gaps but never reorder the sequence.
pub fn load_frames(dir: &Path) -> Result<Vec<VideoFrame>> {
    let paths = frame_paths(dir)?;
    let mut frames = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        match decode_image(&bytes, index as u64) {
            Ok(frame) => frames.push(frame),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping undecodable frame"),
        }
    }

    debug!(listed = paths.len(), decoded = frames.len(), "frames loaded");
    info!("Loaded {} frames from {}", frames.len(), dir.display());
    Ok(frames)
}

/// Face box from an external detector, as `x,y,width,height` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FromStr for Roi {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid ROI '{s}'"))?;
        match parts[..] {
            [x, y, width, height] => Ok(Self { x, y, width, height }),
            _ => Err(anyhow!("ROI '{s}' must be x,y,width,height")),
        }
    }
}

/// Crop every frame to the face box
pub fn crop_frames(frames: Vec<VideoFrame>, roi: Roi) -> Result<Vec<VideoFrame>> {
    frames
        .into_iter()
        .map(|frame| match frame.crop(roi.x, roi.y, roi.width, roi.height) {
            Some(cropped) => Ok(cropped),
            None => bail!(
                "ROI {roi:?} lies outside frame {} ({}x{})",
                frame.index(),
                frame.width(),
                frame.height()
            ),
        })
        .collect()
}

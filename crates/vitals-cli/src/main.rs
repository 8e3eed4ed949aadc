//! rPPG Vitals - command-line entry point

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use vital_report::{assemble_report, RecordingContext, VideoQuality};
use vitals_cli::{crop_frames, init_logging, load_frames, Roi};
use vitals_engine::{EngineConfig, VitalsEngine};

#[derive(Clone, Copy, ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for VideoQuality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Low => VideoQuality::Low,
            QualityArg::Medium => VideoQuality::Medium,
            QualityArg::High => VideoQuality::High,
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Estimate vital signs from extracted face-video frames")]
struct Cli {
    /// Directory of frames, read in file-name order
    frames: PathBuf,
    /// Frames per second of the extraction
    #[arg(long, env = "VITALS_FPS", default_value_t = 30.0)]
    fps: f64,
    /// Engine configuration file (TOML, YAML, or JSON)
    #[arg(long, env = "VITALS_CONFIG")]
    config: Option<PathBuf>,
    /// Face box from an external detector: x,y,width,height
    #[arg(long)]
    roi: Option<Roi>,
    #[arg(long, value_enum, default_value = "medium")]
    video_quality: QualityArg,
    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, short)]
    verbose: bool,
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs)?;

    info!("=== rPPG Vitals v{} ===", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load(cli.config.as_deref())?;
    let engine = VitalsEngine::new(config)?;

    let mut frames = load_frames(&cli.frames)?;
    if let Some(roi) = cli.roi {
        frames = crop_frames(frames, roi)?;
    }
    if frames.is_empty() {
        bail!("no decodable frames in {}", cli.frames.display());
    }

    let context = RecordingContext::now(frames.len() as f64 / cli.fps, cli.video_quality.into());
    let bundle = engine.estimate_vitals(frames, cli.fps)?;
    let report = assemble_report(&bundle, &context);
    let json = report.to_json_pretty()?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

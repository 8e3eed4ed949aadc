use std::f64::consts::PI;
use vitals_engine::{
    estimate_vitals, Confidence, EngineConfig, FilterKind, VideoFrame, VitalsEngine, VitalsError,
};

const FPS: f64 = 5.0;

/// 2x2 RGB frames with a 1.2 Hz pulse in every channel
fn pulse_frames(count: usize) -> Vec<VideoFrame> {
    (0..count)
        .map(|i| {
            let t = i as f64 / FPS;
            let w = (2.0 * PI * 1.2 * t).sin();
            let r = (150.0 + 10.0 * w).round() as u8;
            let g = (120.0 + 40.0 * w).round() as u8;
            let b = (100.0 + 5.0 * (2.0 * PI * 1.2 * t + 0.3).sin()).round() as u8;
            let data = [r, g, b].repeat(4);
            VideoFrame::rgb(data, 2, 2, i as u64).unwrap()
        })
        .collect()
}

fn constant_frames(count: usize) -> Vec<VideoFrame> {
    (0..count)
        .map(|i| VideoFrame::rgb([150, 120, 100].repeat(4), 2, 2, i as u64).unwrap())
        .collect()
}

#[test]
fn test_72_bpm_from_frames() {
    let bundle = estimate_vitals(pulse_frames(100), FPS).unwrap();

    let bpm = bundle.heart_rate.value.unwrap();
    assert!((bpm - 72.0).abs() <= 2.0, "got {bpm}");
    assert_eq!(bundle.heart_rate.unit, "bpm");
    assert_eq!(bundle.frame_count, 100);
    assert!((bundle.recording_seconds() - 20.0).abs() < 1e-12);
    assert!(bundle.hrv.value.unwrap() >= 0.0);
}

#[test]
fn test_constant_series_degrades_gracefully() {
    let bundle = estimate_vitals(constant_frames(50), FPS).unwrap();

    assert_eq!(bundle.heart_rate.value, Some(0.0));
    assert_eq!(bundle.hrv.confidence, Confidence::Low);

    assert!(bundle.spo2.value.is_none());
    assert_eq!(bundle.spo2.confidence, Confidence::Low);
    assert!(bundle.spo2.error.is_some());
    assert!(bundle.oximetry.is_none());

    assert!(bundle.respiratory_rate.value.is_none());
    assert!(bundle.blood_pressure.value.is_none());
    assert_eq!(bundle.overall_confidence().level, Confidence::Low);
}

#[test]
fn test_single_frame_is_insufficient() {
    let err = estimate_vitals(constant_frames(1), FPS).unwrap_err();
    assert_eq!(err, VitalsError::InsufficientData { needed: 2, got: 1 });

    let err = estimate_vitals(Vec::new(), FPS).unwrap_err();
    assert_eq!(err, VitalsError::InsufficientData { needed: 2, got: 0 });
}

#[test]
fn test_two_frames_never_fault() {
    let bundle = estimate_vitals(pulse_frames(2), FPS).unwrap();
    assert!(bundle.respiratory_rate.value.is_none());
    assert!(bundle.mood.value.is_none());
    assert_eq!(bundle.hrv.confidence, Confidence::Low);
}

#[test]
fn test_mixed_frame_sizes_keep_pulse_metrics() {
    let mut frames = pulse_frames(100);
    frames.push(VideoFrame::rgb([150, 120, 100].repeat(6), 3, 2, 100).unwrap());

    let bundle = estimate_vitals(frames, FPS).unwrap();
    assert_eq!(bundle.frame_count, 101);
    assert!(bundle.heart_rate.value.is_some());
    assert!(bundle.hrv.value.is_some());
    assert!(bundle.blood_pressure.value.is_some());

    assert!(bundle.respiratory_rate.value.is_none());
    assert!(bundle.respiratory_rate.error.as_deref().unwrap().contains("shape"));
    assert!(bundle.mood.value.is_none());
    assert!(bundle.mood.error.is_some());
}

#[test]
fn test_out_of_order_frames_rejected() {
    let mut frames = pulse_frames(10);
    frames.swap(2, 7);
    assert!(matches!(
        estimate_vitals(frames, FPS),
        Err(VitalsError::Frame(_))
    ));
}

#[test]
fn test_estimation_is_deterministic() {
    let engine = VitalsEngine::new(EngineConfig::default()).unwrap();
    let first = engine.estimate_vitals(pulse_frames(100), FPS).unwrap();
    let second = engine.estimate_vitals(pulse_frames(100), FPS).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_biquad_filter_selectable() {
    let config = EngineConfig {
        filter_kind: FilterKind::Biquad,
        ..Default::default()
    };
    let frames: Vec<VideoFrame> = (0..600)
        .map(|i| {
            let w = (2.0 * PI * 1.2 * i as f64 / 30.0).sin();
            let g = (120.0 + 40.0 * w).round() as u8;
            VideoFrame::rgb([150, g, 100].repeat(4), 2, 2, i as u64).unwrap()
        })
        .collect();

    let bundle = VitalsEngine::new(config).unwrap().estimate_vitals(frames, 30.0).unwrap();
    assert!(bundle.heart_rate.methodology.contains("biquad"));
    let spectral = bundle.spectral_heart_rate.unwrap();
    assert!((spectral - 72.0).abs() < 6.0, "got {spectral}");
}

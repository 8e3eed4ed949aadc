//! Fixed-table heuristics: blood pressure, stress, mood
//!
//! None of these run new signal processing. They re-score values the
//! cardiac and respiratory analyzers already produced and are reported
//! as experimental.

use crate::types::{BloodPressure, Confidence, Mood, StressLabel, StressLevel, VitalMetric};
use crate::VitalsError;
use signal_conditioning::stats::{mean, std_dev, variance};
use tracing::debug;

pub const BP_METHODOLOGY: &str =
    "Linear mapping of cardiac peak amplitude spread and level; experimental, not a cuff reading";
pub const STRESS_METHODOLOGY: &str =
    "Banded scoring of HRV (weight 0.7) and respiratory rate (weight 0.4)";
pub const MOOD_METHODOLOGY: &str =
    "Threshold rules on motion-energy variance and mean; coarse heuristic, not a learned classifier";

/// Score given to an input that could not be measured
const NEUTRAL_POINTS: f64 = 50.0;

const MOOD_VARIABILITY_THRESHOLD: f64 = 0.2;
const MOOD_MEAN_THRESHOLD: f64 = 0.15;

/// Systolic `110 + round(std * 30)`, diastolic `70 + round(mean * 20)`
pub fn estimate_blood_pressure(peak_values: &[f64]) -> Result<BloodPressure, VitalsError> {
    if peak_values.is_empty() {
        return Err(VitalsError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(BloodPressure {
        systolic: 110.0 + (std_dev(peak_values) * 30.0).round(),
        diastolic: 70.0 + (mean(peak_values) * 20.0).round(),
    })
}

pub fn blood_pressure_metric(peak_values: &[f64]) -> VitalMetric<BloodPressure> {
    match estimate_blood_pressure(peak_values) {
        Ok(bp) => VitalMetric::measured(bp, "mmHg", Confidence::Low, BP_METHODOLOGY),
        Err(e) => VitalMetric::failed("mmHg", BP_METHODOLOGY, &e),
    }
}

fn hrv_points(rmssd_ms: f64) -> f64 {
    if rmssd_ms < 20.0 {
        90.0
    } else if rmssd_ms < 50.0 {
        60.0
    } else if rmssd_ms < 100.0 {
        35.0
    } else {
        10.0
    }
}

fn respiratory_points(breaths_per_min: f64) -> f64 {
    if breaths_per_min > 24.0 {
        90.0
    } else if breaths_per_min > 20.0 {
        70.0
    } else if breaths_per_min >= 12.0 {
        30.0
    } else {
        20.0
    }
}

/// Input to the stress score: a measured value and its confidence
pub type ScoredInput = Option<(f64, Confidence)>;

/// Combine HRV and respiratory rate into a 0-100 stress score.
///
/// A missing input scores a neutral 50 and caps confidence at low;
/// both missing is an error.
pub fn assess_stress(
    hrv: ScoredInput,
    respiratory_rate: ScoredInput,
) -> Result<(StressLevel, Confidence), VitalsError> {
    if hrv.is_none() && respiratory_rate.is_none() {
        return Err(VitalsError::InsufficientData { needed: 1, got: 0 });
    }

    let h = hrv.map_or(NEUTRAL_POINTS, |(v, _)| hrv_points(v));
    let r = respiratory_rate.map_or(NEUTRAL_POINTS, |(v, _)| respiratory_points(v));
    let score = (0.7 * h + 0.4 * r).clamp(0.0, 100.0);

    let confidence = match (hrv, respiratory_rate) {
        (Some((_, a)), Some((_, b))) => a.min(b).min(Confidence::Moderate),
        _ => Confidence::Low,
    };

    debug!(hrv_points = h, rr_points = r, score, "stress scored");

    Ok((
        StressLevel {
            score,
            label: StressLabel::from_score(score),
        },
        confidence,
    ))
}

pub fn stress_metric(hrv: ScoredInput, respiratory_rate: ScoredInput) -> VitalMetric<StressLevel> {
    match assess_stress(hrv, respiratory_rate) {
        Ok((level, confidence)) => {
            VitalMetric::measured(level, "score", confidence, STRESS_METHODOLOGY)
        }
        Err(e) => VitalMetric::failed("score", STRESS_METHODOLOGY, &e),
    }
}

/// Quadrant classification of motion energy
pub fn classify_mood(motion: &[f64]) -> Result<Mood, VitalsError> {
    if motion.len() < 2 {
        return Err(VitalsError::InsufficientData {
            needed: 2,
            got: motion.len(),
        });
    }

    let variable = variance(motion) > MOOD_VARIABILITY_THRESHOLD;
    let energetic = mean(motion) > MOOD_MEAN_THRESHOLD;

    Ok(match (variable, energetic) {
        (true, true) => Mood::Stressed,
        (false, true) => Mood::Active,
        (false, false) => Mood::Calm,
        (true, false) => Mood::Neutral,
    })
}

pub fn mood_metric(motion: &[f64]) -> VitalMetric<Mood> {
    match classify_mood(motion) {
        Ok(mood) => VitalMetric::measured(mood, "category", Confidence::Low, MOOD_METHODOLOGY),
        Err(e) => VitalMetric::failed("category", MOOD_METHODOLOGY, &e),
    }
}

//! Overall confidence across metrics

use crate::types::Confidence;
use serde::{Deserialize, Serialize};

/// Weighted-average score above which overall confidence is high
pub const OVERALL_HIGH: f64 = 0.8;
/// Weighted-average score above which overall confidence is moderate
pub const OVERALL_MODERATE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallConfidence {
    pub score: f64,
    pub level: Confidence,
}

/// Average the confidence weights and re-bucket.
///
/// Levels are tallied before weighting so the result does not depend on
/// input order, even in the last floating-point bit.
pub fn overall_confidence(confidences: &[Confidence]) -> OverallConfidence {
    if confidences.is_empty() {
        return OverallConfidence {
            score: 0.0,
            level: Confidence::Low,
        };
    }

    let count = |level: Confidence| confidences.iter().filter(|&&c| c == level).count() as f64;
    let weighted = count(Confidence::High) * Confidence::High.weight()
        + count(Confidence::Moderate) * Confidence::Moderate.weight()
        + count(Confidence::Low) * Confidence::Low.weight();
    let score = weighted / confidences.len() as f64;

    OverallConfidence {
        score,
        level: Confidence::from_score(score, OVERALL_HIGH, OVERALL_MODERATE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_high() {
        let overall = overall_confidence(&[Confidence::High; 6]);
        assert!((overall.score - 1.0).abs() < 1e-12);
        assert_eq!(overall.level, Confidence::High);
    }

    #[test]
    fn test_mixed_levels() {
        use Confidence::*;
        // (1.0 * 2 + 0.6 * 2 + 0.3 * 2) / 6 = 0.6333
        let overall = overall_confidence(&[High, Moderate, Low, High, Moderate, Low]);
        assert!((overall.score - 3.8 / 6.0).abs() < 1e-12);
        assert_eq!(overall.level, Moderate);
    }

    #[test]
    fn test_all_low() {
        let overall = overall_confidence(&[Confidence::Low; 6]);
        assert!((overall.score - 0.3).abs() < 1e-12);
        assert_eq!(overall.level, Confidence::Low);
    }

    #[test]
    fn test_high_boundary_is_moderate() {
        use Confidence::*;
        // (3 * 1.0 + 3 * 0.6) / 6 lands on 0.8, which is not above it
        let overall = overall_confidence(&[High, High, High, Moderate, Moderate, Moderate]);
        assert!((overall.score - OVERALL_HIGH).abs() < 1e-12);
        assert_eq!(overall.level, Moderate);
        assert_eq!(Confidence::from_score(OVERALL_HIGH, OVERALL_HIGH, OVERALL_MODERATE), Moderate);

        let above = overall_confidence(&[High, High, High, High, High, Moderate]);
        assert_eq!(above.level, High);
    }

    #[test]
    fn test_moderate_boundary_is_low() {
        use Confidence::*;
        // (0.3 + 2 * 0.6) / 3 = 0.5
        let overall = overall_confidence(&[Low, Moderate, Moderate]);
        assert!((overall.score - OVERALL_MODERATE).abs() < 1e-12);
        assert_eq!(overall.level, Low);

        let above = overall_confidence(&[Low, Moderate, Moderate, Moderate]);
        assert_eq!(above.level, Moderate);
    }

    #[test]
    fn test_empty() {
        assert_eq!(overall_confidence(&[]).level, Confidence::Low);
    }

    fn confidence() -> impl Strategy<Value = Confidence> {
        prop_oneof![
            Just(Confidence::Low),
            Just(Confidence::Moderate),
            Just(Confidence::High),
        ]
    }

    proptest! {
        #[test]
        fn prop_order_independent(mut levels in prop::collection::vec(confidence(), 1..12)) {
            let forward = overall_confidence(&levels);
            levels.reverse();
            prop_assert_eq!(forward, overall_confidence(&levels));
            levels.sort();
            prop_assert_eq!(forward, overall_confidence(&levels));
        }

        #[test]
        fn prop_score_within_weights(levels in prop::collection::vec(confidence(), 1..12)) {
            let overall = overall_confidence(&levels);
            prop_assert!(overall.score >= 0.3 - 1e-12 && overall.score <= 1.0 + 1e-12);
        }
    }
}

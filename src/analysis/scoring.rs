//! Score fusion and classification
//!
//! # Algorithm
//!
//! 1. **Family score** (per family, nominally in [0, 1]):
//!    `cosine_weight × cosine + dtw_weight × (1 − min(dtw, saturation) / saturation)`.
//!    With the default saturation of 1.0 this is the plain
//!    `0.6 × cosine + 0.4 × (1 − min(dtw, 1))`. Any DTW cost at or above the
//!    saturation point contributes nothing.
//! 2. **Overall score** (percent):
//!    `(timbral × timbral_weight + harmonic × harmonic_weight) × 100`.
//! 3. **Level**: thresholds are checked from "Very High" down; the first one
//!    the score reaches wins, so boundary values land in the higher band.
//!
//! All weights and thresholds are heuristic, see [`crate::config`].

use super::result::SimilarityLevel;
use crate::config::ComparisonConfig;
use crate::features::FamilyComparison;

/// Fuse one family's triad into a single score
pub fn family_score(comparison: &FamilyComparison, config: &ComparisonConfig) -> f64 {
    let saturated = comparison.dtw_distance.min(config.dtw_saturation);
    let dtw_similarity = 1.0 - saturated / config.dtw_saturation;
    config.cosine_weight * comparison.cosine_similarity + config.dtw_weight * dtw_similarity
}

/// Combine the two family scores into a percentage
pub fn overall_score(timbral_score: f64, harmonic_score: f64, config: &ComparisonConfig) -> f64 {
    (timbral_score * config.timbral_weight + harmonic_score * config.harmonic_weight) * 100.0
}

/// Map a percentage to its level
///
/// Every input maps to exactly one level. NaN and anything below the "Low"
/// threshold (including negative scores) are "Very Low".
pub fn classify(percentage: f64, config: &ComparisonConfig) -> SimilarityLevel {
    if percentage >= config.very_high_threshold {
        SimilarityLevel::VeryHigh
    } else if percentage >= config.high_threshold {
        SimilarityLevel::High
    } else if percentage >= config.moderate_threshold {
        SimilarityLevel::Moderate
    } else if percentage >= config.low_threshold {
        SimilarityLevel::Low
    } else {
        SimilarityLevel::VeryLow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureShape;

    fn triad(dtw: f64, cosine: f64) -> FamilyComparison {
        let shape = FeatureShape {
            dimension: 13,
            frame_count: 50,
        };
        FamilyComparison {
            dtw_distance: dtw,
            cosine_similarity: cosine,
            euclidean_distance: 0.0,
            left_shape: shape,
            right_shape: shape,
        }
    }

    #[test]
    fn test_perfect_family_score() {
        let config = ComparisonConfig::default();
        assert_eq!(family_score(&triad(0.0, 1.0), &config), 1.0);
    }

    #[test]
    fn test_worst_family_score() {
        let config = ComparisonConfig::default();
        assert_eq!(family_score(&triad(1.0, 0.0), &config), 0.0);
    }

    #[test]
    fn test_partial_family_score() {
        let config = ComparisonConfig::default();
        // 0.6 * 0.5 + 0.4 * (1 - 0.25) = 0.3 + 0.3
        let score = family_score(&triad(0.25, 0.5), &config);
        assert!((score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_dtw_saturation_holds() {
        let config = ComparisonConfig::default();
        let at_one = family_score(&triad(1.0, 0.7), &config);
        for dtw in [1.0001, 1.5, 10.0, 1e9, f64::INFINITY] {
            assert_eq!(family_score(&triad(dtw, 0.7), &config), at_one);
        }
    }

    #[test]
    fn test_overall_extremes() {
        let config = ComparisonConfig::default();
        assert_eq!(overall_score(1.0, 1.0, &config), 100.0);
        assert_eq!(overall_score(0.0, 0.0, &config), 0.0);
        assert_eq!(classify(100.0, &config), SimilarityLevel::VeryHigh);
        assert_eq!(classify(0.0, &config), SimilarityLevel::VeryLow);
    }

    #[test]
    fn test_overall_weights_timbral_higher() {
        let config = ComparisonConfig::default();
        let timbral_only = overall_score(1.0, 0.0, &config);
        let harmonic_only = overall_score(0.0, 1.0, &config);
        assert!((timbral_only - 60.0).abs() < 1e-9);
        assert!((harmonic_only - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundaries_go_to_higher_band() {
        let config = ComparisonConfig::default();
        assert_eq!(classify(80.0, &config), SimilarityLevel::VeryHigh);
        assert_eq!(classify(60.0, &config), SimilarityLevel::High);
        assert_eq!(classify(40.0, &config), SimilarityLevel::Moderate);
        assert_eq!(classify(20.0, &config), SimilarityLevel::Low);

        assert_eq!(classify(79.999, &config), SimilarityLevel::High);
        assert_eq!(classify(59.999, &config), SimilarityLevel::Moderate);
        assert_eq!(classify(39.999, &config), SimilarityLevel::Low);
        assert_eq!(classify(19.999, &config), SimilarityLevel::VeryLow);
    }

    #[test]
    fn test_classification_is_total() {
        let config = ComparisonConfig::default();
        assert_eq!(classify(-35.0, &config), SimilarityLevel::VeryLow);
        assert_eq!(classify(f64::NAN, &config), SimilarityLevel::VeryLow);
        assert_eq!(classify(150.0, &config), SimilarityLevel::VeryHigh);
        assert_eq!(classify(f64::NEG_INFINITY, &config), SimilarityLevel::VeryLow);
    }
}

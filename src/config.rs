//! Configuration parameters for similarity scoring
//!
//! The fusion weights and level thresholds are heuristic constants carried over
//! unchanged from the reference scoring scheme. They are exposed here so they can
//! be tuned, but the defaults must stay as-is for compatible scores.

use crate::error::ComparisonError;
use serde::{Deserialize, Serialize};

/// Weight of the mean-vector cosine similarity in a family score
pub const FAMILY_COSINE_WEIGHT: f64 = 0.6;

/// Weight of the (saturated, inverted) DTW cost in a family score
pub const FAMILY_DTW_WEIGHT: f64 = 0.4;

/// DTW costs at or above this value count as fully dissimilar
pub const DTW_SATURATION: f64 = 1.0;

/// Weight of the timbral (MFCC) family in the overall score
pub const TIMBRAL_WEIGHT: f64 = 0.6;

/// Weight of the harmonic (chroma) family in the overall score
pub const HARMONIC_WEIGHT: f64 = 0.4;

/// Lower bound (inclusive, percent) of the "Very High" level
pub const VERY_HIGH_THRESHOLD: f64 = 80.0;

/// Lower bound (inclusive, percent) of the "High" level
pub const HIGH_THRESHOLD: f64 = 60.0;

/// Lower bound (inclusive, percent) of the "Moderate" level
pub const MODERATE_THRESHOLD: f64 = 40.0;

/// Lower bound (inclusive, percent) of the "Low" level
pub const LOW_THRESHOLD: f64 = 20.0;

/// Similarity scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    // Family fusion
    /// Weight of cosine similarity within a family score (default: 0.6)
    pub cosine_weight: f64,

    /// Weight of `1 - min(dtw, saturation)` within a family score (default: 0.4)
    pub dtw_weight: f64,

    /// DTW cost treated as fully dissimilar (default: 1.0)
    ///
    /// Raw DTW cost is unbounded above, so it is clamped to this value before
    /// being inverted into a similarity term.
    pub dtw_saturation: f64,

    // Overall fusion
    /// Weight of the timbral family in the overall score (default: 0.6)
    pub timbral_weight: f64,

    /// Weight of the harmonic family in the overall score (default: 0.4)
    pub harmonic_weight: f64,

    // Classification
    /// Minimum overall percentage for "Very High" (default: 80.0)
    pub very_high_threshold: f64,

    /// Minimum overall percentage for "High" (default: 60.0)
    pub high_threshold: f64,

    /// Minimum overall percentage for "Moderate" (default: 40.0)
    pub moderate_threshold: f64,

    /// Minimum overall percentage for "Low" (default: 20.0)
    pub low_threshold: f64,

    // Resource limits
    /// Reject sequences longer than this many frames before alignment (default: None)
    ///
    /// DTW is O(n·m) with no natural suspension point, so oversized inputs are
    /// refused up front instead of being cancelled mid-way.
    pub max_frames: Option<usize>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            cosine_weight: FAMILY_COSINE_WEIGHT,
            dtw_weight: FAMILY_DTW_WEIGHT,
            dtw_saturation: DTW_SATURATION,
            timbral_weight: TIMBRAL_WEIGHT,
            harmonic_weight: HARMONIC_WEIGHT,
            very_high_threshold: VERY_HIGH_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            moderate_threshold: MODERATE_THRESHOLD,
            low_threshold: LOW_THRESHOLD,
            max_frames: None,
        }
    }
}

impl ComparisonConfig {
    /// Check that weights are finite and non-negative, the saturation point is
    /// positive, and the level thresholds are strictly descending.
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError::InvalidInput` describing the first violation found.
    pub fn validate(&self) -> Result<(), ComparisonError> {
        let weights = [
            ("cosine_weight", self.cosine_weight),
            ("dtw_weight", self.dtw_weight),
            ("timbral_weight", self.timbral_weight),
            ("harmonic_weight", self.harmonic_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ComparisonError::InvalidInput(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if !self.dtw_saturation.is_finite() || self.dtw_saturation <= 0.0 {
            return Err(ComparisonError::InvalidInput(format!(
                "dtw_saturation must be finite and positive, got {}",
                self.dtw_saturation
            )));
        }

        let thresholds = [
            self.very_high_threshold,
            self.high_threshold,
            self.moderate_threshold,
            self.low_threshold,
        ];
        if thresholds.iter().any(|t| !t.is_finite())
            || thresholds.windows(2).any(|w| w[0] <= w[1])
        {
            return Err(ComparisonError::InvalidInput(format!(
                "level thresholds must be finite and strictly descending, got {:?}",
                thresholds
            )));
        }

        if self.max_frames == Some(0) {
            return Err(ComparisonError::InvalidInput(
                "max_frames must be at least 1 when set".to_string(),
            ));
        }

        Ok(())
    }
}

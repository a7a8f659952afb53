//! Comparison result types

use crate::features::{AudioInfo, FamilyComparison};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serde adapters writing a [`FamilyComparison`] with family-prefixed shape
/// keys (`mfcc1_shape`, `chroma2_shape`, ...)
macro_rules! family_keys {
    ($module:ident, $left:ident, $right:ident) => {
        mod $module {
            use crate::features::{FamilyComparison, FeatureShape};
            use serde::{Deserialize, Deserializer, Serialize, Serializer};

            #[derive(Serialize, Deserialize)]
            struct Keys {
                dtw_distance: f64,
                cosine_similarity: f64,
                euclidean_distance: f64,
                $left: FeatureShape,
                $right: FeatureShape,
            }

            pub fn serialize<S: Serializer>(
                cmp: &FamilyComparison,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                Keys {
                    dtw_distance: cmp.dtw_distance,
                    cosine_similarity: cmp.cosine_similarity,
                    euclidean_distance: cmp.euclidean_distance,
                    $left: cmp.left_shape,
                    $right: cmp.right_shape,
                }
                .serialize(serializer)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(
                deserializer: D,
            ) -> Result<FamilyComparison, D::Error> {
                let keys = Keys::deserialize(deserializer)?;
                Ok(FamilyComparison {
                    dtw_distance: keys.dtw_distance,
                    cosine_similarity: keys.cosine_similarity,
                    euclidean_distance: keys.euclidean_distance,
                    left_shape: keys.$left,
                    right_shape: keys.$right,
                })
            }
        }
    };
}

family_keys!(mfcc_keys, mfcc1_shape, mfcc2_shape);
family_keys!(chroma_keys, chroma1_shape, chroma2_shape);

/// Categorical similarity level, ordered from least to most similar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SimilarityLevel {
    /// Below the "Low" threshold
    #[serde(rename = "Very Low")]
    VeryLow,
    /// At least the "Low" threshold
    #[serde(rename = "Low")]
    Low,
    /// At least the "Moderate" threshold
    #[serde(rename = "Moderate")]
    Moderate,
    /// At least the "High" threshold
    #[serde(rename = "High")]
    High,
    /// At least the "Very High" threshold
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl SimilarityLevel {
    /// All levels, lowest first
    pub const ALL: [SimilarityLevel; 5] = [
        SimilarityLevel::VeryLow,
        SimilarityLevel::Low,
        SimilarityLevel::Moderate,
        SimilarityLevel::High,
        SimilarityLevel::VeryHigh,
    ];

    /// Human-readable label (e.g., "Very High")
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_compare::analysis::result::SimilarityLevel;
    ///
    /// assert_eq!(SimilarityLevel::VeryHigh.label(), "Very High");
    /// assert_eq!(SimilarityLevel::Moderate.label(), "Moderate");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            SimilarityLevel::VeryLow => "Very Low",
            SimilarityLevel::Low => "Low",
            SimilarityLevel::Moderate => "Moderate",
            SimilarityLevel::High => "High",
            SimilarityLevel::VeryHigh => "Very High",
        }
    }

    /// Parse a label produced by [`SimilarityLevel::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

impl fmt::Display for SimilarityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of comparing two feature sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Overall similarity percentage, unclamped
    ///
    /// Nominally in [0, 100]; can fall below 0 when cosine similarities are
    /// negative. Use [`ComparisonResult::display_percentage`] for presentation.
    pub overall_similarity: f64,

    /// Level assigned to `overall_similarity`
    pub similarity_level: SimilarityLevel,

    /// Timbral (MFCC) family triad
    #[serde(rename = "mfcc_comparison", with = "mfcc_keys")]
    pub timbral: FamilyComparison,

    /// Harmonic (chroma) family triad
    #[serde(rename = "chroma_comparison", with = "chroma_keys")]
    pub harmonic: FamilyComparison,

    /// Fused timbral family score
    pub timbral_score: f64,

    /// Fused harmonic family score
    pub harmonic_score: f64,

    /// Metadata of the left-hand recording
    pub audio1_info: AudioInfo,

    /// Metadata of the right-hand recording
    pub audio2_info: AudioInfo,
}

impl ComparisonResult {
    /// Overall similarity clamped to [0, 100]
    pub fn display_percentage(&self) -> f64 {
        if self.overall_similarity.is_nan() {
            return 0.0;
        }
        self.overall_similarity.clamp(0.0, 100.0)
    }
}

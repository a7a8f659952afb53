//! Per-family feature comparison
//!
//! Compares one feature family (timbral or harmonic) of two recordings three
//! ways:
//!
//! - **DTW distance** over the full frame sequences (sensitive to temporal structure)
//! - **Cosine similarity** of the mean vectors (coarse spectral shape, timing-blind)
//! - **Euclidean distance** of the mean vectors (same inputs, different geometry)
//!
//! Nothing is thresholded here; fusion happens in [`crate::analysis::scoring`].

use super::distance::{cosine_similarity, euclidean_with, LengthPolicy};
use super::dtw::dtw_distance;
use super::sequence::{FeatureFamily, FrameSequence};
use crate::error::ComparisonError;
use serde::{Deserialize, Serialize};

/// Matrix shape as `(dimension, frame_count)`, serialized as `[dimension, frame_count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct FeatureShape {
    /// Values per frame
    pub dimension: usize,
    /// Number of frames
    pub frame_count: usize,
}

impl From<[usize; 2]> for FeatureShape {
    fn from(shape: [usize; 2]) -> Self {
        Self {
            dimension: shape[0],
            frame_count: shape[1],
        }
    }
}

impl From<FeatureShape> for [usize; 2] {
    fn from(shape: FeatureShape) -> Self {
        [shape.dimension, shape.frame_count]
    }
}

impl From<&FrameSequence> for FeatureShape {
    fn from(seq: &FrameSequence) -> Self {
        Self {
            dimension: seq.dimension(),
            frame_count: seq.n_frames(),
        }
    }
}

/// Distance/similarity triad for one feature family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyComparison {
    /// Normalized DTW cost between the frame sequences (0 = identical, unbounded above)
    pub dtw_distance: f64,
    /// Cosine similarity of the mean vectors
    pub cosine_similarity: f64,
    /// Euclidean distance between the mean vectors
    pub euclidean_distance: f64,
    /// Shape of the left-hand input
    pub left_shape: FeatureShape,
    /// Shape of the right-hand input
    pub right_shape: FeatureShape,
}

/// Compare one feature family of two recordings
///
/// Mean vectors of different length are clipped to the shorter one for the
/// cosine and Euclidean terms. The DTW term requires equal frame dimensions.
///
/// # Errors
///
/// - `DimensionMismatch` if the frame dimensions differ
/// - `EmptySequence` if either sequence is empty
///
/// # Example
///
/// ```
/// use stratum_compare::features::{compare_feature_families, FeatureFamily, FrameSequence};
///
/// let frames = FrameSequence::from_frames(&[vec![1.0, 0.5], vec![0.8, 0.7]])?;
/// let family = FeatureFamily::from_frames(frames);
/// let cmp = compare_feature_families(&family, &family)?;
/// assert_eq!(cmp.dtw_distance, 0.0);
/// assert!((cmp.cosine_similarity - 1.0).abs() < 1e-12);
/// # Ok::<(), stratum_compare::ComparisonError>(())
/// ```
pub fn compare_feature_families(
    a: &FeatureFamily,
    b: &FeatureFamily,
) -> Result<FamilyComparison, ComparisonError> {
    let dtw = dtw_distance(a.frames(), b.frames())?;
    let cosine = cosine_similarity(a.mean(), b.mean());
    let euclid = euclidean_with(a.mean(), b.mean(), LengthPolicy::TruncateToShorter)?;

    log::debug!(
        "Family comparison: dtw={:.4}, cosine={:.4}, euclidean={:.4}",
        dtw,
        cosine,
        euclid
    );

    Ok(FamilyComparison {
        dtw_distance: dtw,
        cosine_similarity: cosine,
        euclidean_distance: euclid,
        left_shape: a.frames().into(),
        right_shape: b.frames().into(),
    })
}

//! Feature data model and comparison primitives
//!
//! This module contains everything below score fusion:
//! - Frame sequences, summaries and feature sets
//! - Distance primitives (Euclidean, cosine)
//! - DTW alignment
//! - Per-family comparison

pub mod comparator;
pub mod distance;
pub mod dtw;
pub mod sequence;

pub use comparator::{compare_feature_families, FamilyComparison, FeatureShape};
pub use distance::{cosine_similarity, euclidean, euclidean_with, LengthPolicy};
pub use dtw::{dtw_align, dtw_distance, DtwAlignment};
pub use sequence::{
    AudioFeatureSet, AudioInfo, FeatureFamily, FeatureSummary, FrameSequence,
    HARMONIC_DIMENSION, TIMBRAL_DIMENSION,
};

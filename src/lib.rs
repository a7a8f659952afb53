//! # Stratum Compare
//!
//! Audio similarity engine over pre-computed feature sequences. Given the MFCC
//! (timbral) and chroma (harmonic) frame matrices of two recordings, it aligns
//! them with Dynamic Time Warping, compares their summary vectors, and fuses
//! everything into one percentage and a categorical level.
//!
//! ## Features
//!
//! - **DTW alignment**: full cost table or a two-row variant, normalized by `n + m`
//! - **Distance primitives**: Euclidean and cosine with a documented truncation policy
//! - **Score fusion**: fixed, tunable weights and thresholds
//! - **Batch comparison**: parallel pairwise comparison and ranking via rayon
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_compare::compare_feature_files;
//!
//! let result = compare_feature_files("features/a_features.json", "features/b_features.json")?;
//!
//! println!("Similarity: {:.1}% ({})", result.display_percentage(), result.similarity_level);
//! # Ok::<(), stratum_compare::ComparisonError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Feature records → FrameSequence/FeatureSummary → DTW + cosine + Euclidean → Fusion → Level
//! ```
//!
//! Feature extraction from waveforms is out of scope; records come from an
//! external extractor (see [`io::record`] for the layout).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;

// Re-export main types
pub use analysis::batch::{compare_pairs, rank_candidates, RankOptions, RankedMatch};
pub use analysis::result::{ComparisonResult, SimilarityLevel};
pub use config::ComparisonConfig;
pub use error::ComparisonError;
pub use features::{
    compare_feature_families, AudioFeatureSet, AudioInfo, FamilyComparison, FeatureFamily,
    FeatureShape, FeatureSummary, FrameSequence,
};

fn check_frame_cap(
    family: &str,
    a: &FeatureFamily,
    b: &FeatureFamily,
    max_frames: Option<usize>,
) -> Result<(), ComparisonError> {
    let Some(limit) = max_frames else {
        return Ok(());
    };
    let longest = a.frames().n_frames().max(b.frames().n_frames());
    if longest > limit {
        return Err(ComparisonError::InvalidInput(format!(
            "{} sequence has {} frames, limit is {}",
            family, longest, limit
        )));
    }
    Ok(())
}

/// Compare two feature sets with the default scoring configuration
///
/// # Arguments
///
/// * `a` - Features of the first recording
/// * `b` - Features of the second recording
///
/// # Returns
///
/// `ComparisonResult` with both family triads, fused scores, the overall
/// percentage and its level
///
/// # Errors
///
/// - `DimensionMismatch` if a family's frame dimensions differ between the recordings
/// - `EmptySequence` if a family has no frames
///
/// # Example
///
/// ```
/// use stratum_compare::{compare_feature_sets, AudioFeatureSet, AudioInfo, FeatureFamily, FrameSequence, SimilarityLevel};
///
/// let mfcc = FrameSequence::from_frames(&vec![vec![1.0; 13]; 8])?;
/// let chroma = FrameSequence::from_frames(&vec![vec![0.5; 12]; 8])?;
/// let info = AudioInfo {
///     filename: None,
///     duration_seconds: 0.2,
///     sample_rate: 22050,
///     num_samples: None,
///     tempo_bpm: 0.0,
///     beat_count: 0,
/// };
/// let set = AudioFeatureSet::new(info, FeatureFamily::from_frames(mfcc), FeatureFamily::from_frames(chroma))?;
///
/// let result = compare_feature_sets(&set, &set)?;
/// assert_eq!(result.similarity_level, SimilarityLevel::VeryHigh);
/// # Ok::<(), stratum_compare::ComparisonError>(())
/// ```
pub fn compare_feature_sets(
    a: &AudioFeatureSet,
    b: &AudioFeatureSet,
) -> Result<ComparisonResult, ComparisonError> {
    compare_feature_sets_with_config(a, b, &ComparisonConfig::default())
}

/// Compare two feature sets with explicit weights, thresholds and limits
///
/// # Errors
///
/// - `InvalidInput` if `config` fails validation or a sequence exceeds `config.max_frames`
/// - `DimensionMismatch` if a family's frame dimensions differ between the recordings
/// - `EmptySequence` if a family has no frames
pub fn compare_feature_sets_with_config(
    a: &AudioFeatureSet,
    b: &AudioFeatureSet,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, ComparisonError> {
    config.validate()?;
    check_frame_cap("mfcc", a.timbral(), b.timbral(), config.max_frames)?;
    check_frame_cap("chroma", a.harmonic(), b.harmonic(), config.max_frames)?;

    log::debug!(
        "Comparing feature sets: mfcc {}x{} vs {}x{}, chroma {}x{} vs {}x{}",
        a.timbral().frames().dimension(),
        a.timbral().frames().n_frames(),
        b.timbral().frames().dimension(),
        b.timbral().frames().n_frames(),
        a.harmonic().frames().dimension(),
        a.harmonic().frames().n_frames(),
        b.harmonic().frames().dimension(),
        b.harmonic().frames().n_frames(),
    );

    let timbral = compare_feature_families(a.timbral(), b.timbral())?;
    let harmonic = compare_feature_families(a.harmonic(), b.harmonic())?;

    use analysis::scoring::{classify, family_score, overall_score};
    let timbral_score = family_score(&timbral, config);
    let harmonic_score = family_score(&harmonic, config);
    let overall_similarity = overall_score(timbral_score, harmonic_score, config);
    let similarity_level = classify(overall_similarity, config);

    log::debug!(
        "Overall similarity {:.2}% ({}), timbral={:.4}, harmonic={:.4}",
        overall_similarity,
        similarity_level,
        timbral_score,
        harmonic_score
    );

    Ok(ComparisonResult {
        overall_similarity,
        similarity_level,
        timbral,
        harmonic,
        timbral_score,
        harmonic_score,
        audio1_info: a.info().clone(),
        audio2_info: b.info().clone(),
    })
}

/// Load two feature records from JSON files and compare them
///
/// # Errors
///
/// - `IoError` if either file cannot be read
/// - `MalformedFeatureSet` if either record is invalid
/// - any error from [`compare_feature_sets`]
pub fn compare_feature_files<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
    path_a: P,
    path_b: Q,
) -> Result<ComparisonResult, ComparisonError> {
    let a = io::load_feature_set(path_a)?;
    let b = io::load_feature_set(path_b)?;
    compare_feature_sets(&a, &b)
}

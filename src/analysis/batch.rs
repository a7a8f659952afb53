//! Parallel batch comparison
//!
//! Comparisons share no state, so a batch is just a parallel map over a rayon
//! pool. Callers that want a specific worker count can run these inside
//! `rayon::ThreadPool::install`.

use super::result::ComparisonResult;
use crate::compare_feature_sets_with_config;
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::features::AudioFeatureSet;
use rayon::prelude::*;

/// Compare each pair independently
///
/// Results come back in input order. One failing pair does not affect the others.
pub fn compare_pairs(
    pairs: &[(&AudioFeatureSet, &AudioFeatureSet)],
    config: &ComparisonConfig,
) -> Vec<Result<ComparisonResult, ComparisonError>> {
    log::debug!("Batch comparing {} pairs", pairs.len());
    pairs
        .par_iter()
        .map(|(a, b)| compare_feature_sets_with_config(a, b, config))
        .collect()
}

/// Filtering for [`rank_candidates`]
#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Drop candidates whose overall similarity is below this percentage (default: no limit)
    pub min_similarity: f64,
    /// Keep at most this many matches (default: all)
    pub max_results: Option<usize>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_similarity: f64::NEG_INFINITY,
            max_results: None,
        }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    /// Index of the candidate in the input slice
    pub index: usize,
    /// Comparison of the target against that candidate
    pub result: ComparisonResult,
}

/// Compare a target against every candidate and sort by overall similarity, highest first
///
/// Equal scores keep their input order.
///
/// # Errors
///
/// Returns the error of the lowest-indexed failing candidate; no partial
/// ranking is produced.
pub fn rank_candidates(
    target: &AudioFeatureSet,
    candidates: &[AudioFeatureSet],
    config: &ComparisonConfig,
    options: &RankOptions,
) -> Result<Vec<RankedMatch>, ComparisonError> {
    log::debug!("Ranking {} candidates", candidates.len());

    let results = candidates
        .par_iter()
        .map(|candidate| compare_feature_sets_with_config(target, candidate, config))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    let mut ranked: Vec<RankedMatch> = results
        .into_iter()
        .enumerate()
        .filter(|(_, result)| result.overall_similarity >= options.min_similarity)
        .map(|(index, result)| RankedMatch { index, result })
        .collect();

    ranked.sort_by(|a, b| {
        b.result
            .overall_similarity
            .partial_cmp(&a.result.overall_similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(limit) = options.max_results {
        ranked.truncate(limit);
    }

    Ok(ranked)
}

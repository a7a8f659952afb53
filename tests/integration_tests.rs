//! Integration tests for the similarity engine

use stratum_compare::io::{load_feature_set, parse_feature_set, result_to_json, save_feature_set};
use stratum_compare::{
    compare_feature_files, compare_feature_sets, compare_feature_sets_with_config,
    AudioFeatureSet, AudioInfo, ComparisonConfig, ComparisonError, ComparisonResult,
    FeatureFamily, FrameSequence, SimilarityLevel,
};

fn info(name: &str, frames: usize) -> AudioInfo {
    AudioInfo {
        filename: Some(name.to_string()),
        duration_seconds: frames as f64 * 512.0 / 22050.0,
        sample_rate: 22050,
        num_samples: Some(frames as u64 * 512),
        tempo_bpm: 117.45,
        beat_count: 4,
    }
}

/// Channel-major MFCC-like matrix: 13 x frames
fn mfcc_matrix(frames: usize, freq: f64, offset: f64) -> Vec<Vec<f64>> {
    (0..13)
        .map(|d| {
            (0..frames)
                .map(|t| (t as f64 * freq + d as f64 * 0.5).sin() * (13 - d) as f64 + offset)
                .collect()
        })
        .collect()
}

/// Channel-major chroma-like matrix: 12 x frames, values in [0, 1]
fn chroma_matrix(frames: usize, root: usize) -> Vec<Vec<f64>> {
    (0..12)
        .map(|pc| {
            (0..frames)
                .map(|t| {
                    let in_triad = [root, (root + 4) % 12, (root + 7) % 12].contains(&pc);
                    let base = if in_triad { 0.9 } else { 0.1 };
                    base + 0.05 * ((t as f64 * 0.2).cos())
                })
                .collect()
        })
        .collect()
}

fn feature_set(name: &str, frames: usize, freq: f64, offset: f64, root: usize) -> AudioFeatureSet {
    let mfcc = FrameSequence::from_channel_major(&mfcc_matrix(frames, freq, offset)).unwrap();
    let chroma = FrameSequence::from_channel_major(&chroma_matrix(frames, root)).unwrap();
    AudioFeatureSet::new(
        info(name, frames),
        FeatureFamily::from_frames(mfcc),
        FeatureFamily::from_frames(chroma),
    )
    .unwrap()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{} should be {}, got {}",
        what,
        expected,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_recordings_score_very_high() {
        let set = feature_set("same.wav", 50, 0.3, 0.0, 0);
        let result = compare_feature_sets(&set, &set).expect("comparison should succeed");

        assert_eq!(result.timbral.dtw_distance, 0.0);
        assert_close(result.timbral.cosine_similarity, 1.0, "timbral cosine");
        assert_close(result.timbral_score, 1.0, "timbral score");
        assert_close(result.harmonic_score, 1.0, "harmonic score");
        assert_close(result.overall_similarity, 100.0, "overall similarity");
        assert_eq!(result.similarity_level, SimilarityLevel::VeryHigh);
        assert_eq!(result.timbral.left_shape.dimension, 13);
        assert_eq!(result.timbral.left_shape.frame_count, 50);
        assert_eq!(result.harmonic.right_shape.dimension, 12);
    }

    #[test]
    fn test_opposite_recordings_score_very_low() {
        // Orthogonal mean vectors in both families; timbral frames far enough
        // apart to saturate DTW.
        let mut timbral_a = vec![vec![0.0; 13]; 10];
        let mut timbral_b = vec![vec![0.0; 13]; 10];
        for frame in timbral_a.iter_mut() {
            frame[0] = 5.0;
        }
        for frame in timbral_b.iter_mut() {
            frame[1] = 5.0;
        }
        let mut harmonic_a = vec![vec![0.0; 12]; 10];
        let mut harmonic_b = vec![vec![0.0; 12]; 10];
        for frame in harmonic_a.iter_mut() {
            frame[0] = 1.0;
        }
        for frame in harmonic_b.iter_mut() {
            frame[6] = 1.0;
        }

        let build = |timbral: &[Vec<f64>], harmonic: &[Vec<f64>], name: &str| {
            AudioFeatureSet::new(
                info(name, 10),
                FeatureFamily::from_frames(FrameSequence::from_frames(timbral).unwrap()),
                FeatureFamily::from_frames(FrameSequence::from_frames(harmonic).unwrap()),
            )
            .unwrap()
        };
        let a = build(&timbral_a, &harmonic_a, "a.wav");
        let b = build(&timbral_b, &harmonic_b, "b.wav");

        let result = compare_feature_sets(&a, &b).unwrap();
        assert_eq!(result.timbral.cosine_similarity, 0.0);
        assert_eq!(result.harmonic.cosine_similarity, 0.0);
        assert!(result.timbral.dtw_distance >= 1.0);
        assert!(result.harmonic.dtw_distance < 1.0);
        assert_eq!(result.timbral_score, 0.0);
        // Chroma frames are sqrt(2) apart, so DTW = 10*sqrt(2)/20 ≈ 0.707
        assert!(result.harmonic_score > 0.0 && result.harmonic_score < 0.2);
        assert!(result.overall_similarity < 20.0);
        assert_eq!(result.similarity_level, SimilarityLevel::VeryLow);
    }

    #[test]
    fn test_comparison_is_symmetric() {
        let a = feature_set("a.wav", 40, 0.3, 0.0, 0);
        let b = feature_set("b.wav", 55, 0.25, 0.4, 7);

        let ab = compare_feature_sets(&a, &b).unwrap();
        let ba = compare_feature_sets(&b, &a).unwrap();
        assert_eq!(ab.timbral.dtw_distance, ba.timbral.dtw_distance);
        assert_eq!(ab.harmonic.dtw_distance, ba.harmonic.dtw_distance);
        assert_eq!(ab.timbral.cosine_similarity, ba.timbral.cosine_similarity);
        assert_eq!(ab.overall_similarity, ba.overall_similarity);
        assert_eq!(ab.audio1_info, ba.audio2_info);
    }

    #[test]
    fn test_similar_beats_dissimilar() {
        let reference = feature_set("ref.wav", 60, 0.3, 0.0, 0);
        let close = feature_set("close.wav", 64, 0.3, 0.05, 0);
        let far = feature_set("far.wav", 60, 0.9, 3.0, 6);

        let close_result = compare_feature_sets(&reference, &close).unwrap();
        let far_result = compare_feature_sets(&reference, &far).unwrap();
        assert!(close_result.overall_similarity > far_result.overall_similarity);
        assert!(close_result.similarity_level >= far_result.similarity_level);
    }

    #[test]
    fn test_frame_dimension_mismatch_is_reported() {
        let a = feature_set("a.wav", 20, 0.3, 0.0, 0);
        let short_mfcc: Vec<Vec<f64>> = mfcc_matrix(20, 0.3, 0.0).into_iter().take(12).collect();
        let b = AudioFeatureSet::new(
            info("b.wav", 20),
            FeatureFamily::from_frames(FrameSequence::from_channel_major(&short_mfcc).unwrap()),
            FeatureFamily::from_frames(
                FrameSequence::from_channel_major(&chroma_matrix(20, 0)).unwrap(),
            ),
        )
        .unwrap();

        assert!(matches!(
            compare_feature_sets(&a, &b),
            Err(ComparisonError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_frame_cap_rejects_before_alignment() {
        let a = feature_set("a.wav", 120, 0.3, 0.0, 0);
        let config = ComparisonConfig {
            max_frames: Some(100),
            ..ComparisonConfig::default()
        };
        assert!(matches!(
            compare_feature_sets_with_config(&a, &a, &config),
            Err(ComparisonError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_files_roundtrip_and_compare() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("features").join("a_features.json");
        let path_b = dir.path().join("features").join("b_features.json");

        let a = feature_set("a.wav", 30, 0.3, 0.0, 0);
        let b = feature_set("b.wav", 35, 0.35, 0.2, 2);
        save_feature_set(&a.clone().with_extraction_time(0.12), &path_a).unwrap();
        save_feature_set(&b, &path_b).unwrap();

        let loaded = load_feature_set(&path_a).unwrap();
        assert_eq!(loaded.timbral().frames(), a.timbral().frames());
        assert_eq!(loaded.extraction_time(), Some(0.12));

        let from_files = compare_feature_files(&path_a, &path_b).unwrap();
        let in_memory = compare_feature_sets(&a, &b).unwrap();
        assert_eq!(from_files.overall_similarity, in_memory.overall_similarity);

        let json = result_to_json(&from_files).unwrap();
        let parsed: ComparisonResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.similarity_level, from_files.similarity_level);
        assert!(json.contains("\"mfcc_comparison\""));
        assert!(json.contains("\"chroma_comparison\""));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_feature_set(&missing),
            Err(ComparisonError::IoError(_))
        ));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let json = r#"{"audio_info": {"duration": 1.0, "sample_rate": 22050, "tempo": 0.0, "num_beats": 0},
                       "mfcc": {"mfcc": [[1.0]], "mfcc_mean": [1.0], "mfcc_std": [0.0],
                                "mfcc_min": [1.0], "mfcc_max": [1.0], "shape": [1, 1]}}"#;
        assert!(matches!(
            parse_feature_set(json),
            Err(ComparisonError::MalformedFeatureSet(_))
        ));
    }

    #[test]
    fn test_display_percentage_clamps_negative_scores() {
        // Anti-correlated means push cosine to -1 and the raw score below zero
        let timbral_a = FrameSequence::from_frames(&vec![vec![1.0; 13]; 4]).unwrap();
        let timbral_b = FrameSequence::from_frames(&vec![vec![-1.0; 13]; 4]).unwrap();
        let harmonic_a = FrameSequence::from_frames(&vec![vec![1.0; 12]; 4]).unwrap();
        let harmonic_b = FrameSequence::from_frames(&vec![vec![-1.0; 12]; 4]).unwrap();
        let a = AudioFeatureSet::new(
            info("a.wav", 4),
            FeatureFamily::from_frames(timbral_a),
            FeatureFamily::from_frames(harmonic_a),
        )
        .unwrap();
        let b = AudioFeatureSet::new(
            info("b.wav", 4),
            FeatureFamily::from_frames(timbral_b),
            FeatureFamily::from_frames(harmonic_b),
        )
        .unwrap();

        let result = compare_feature_sets(&a, &b).unwrap();
        assert_close(result.overall_similarity, -60.0, "raw overall similarity");
        assert_eq!(result.display_percentage(), 0.0);
        assert_eq!(result.similarity_level, SimilarityLevel::VeryLow);
    }
}

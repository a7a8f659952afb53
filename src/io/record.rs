//! Extractor JSON record layout
//!
//! Mirrors the mapping written by the feature extractor: one `audio_info`
//! object plus one object per feature family holding the channel-major matrix
//! (D rows × T columns), four summary vectors and the `shape` pair.

use crate::error::ComparisonError;
use crate::features::{
    AudioFeatureSet, AudioInfo, FeatureFamily, FeatureShape, FeatureSummary, FrameSequence,
};
use serde::{Deserialize, Serialize};

/// Full feature record for one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Recording metadata
    pub audio_info: AudioInfo,
    /// Timbral family
    pub mfcc: MfccRecord,
    /// Harmonic family
    pub chroma: ChromaRecord,
    /// Extraction wall-clock time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_time: Option<f64>,
}

/// `mfcc` object of a feature record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccRecord {
    /// Channel-major coefficient matrix
    pub mfcc: Vec<Vec<f64>>,
    /// Per-coefficient mean
    pub mfcc_mean: Vec<f64>,
    /// Per-coefficient standard deviation
    pub mfcc_std: Vec<f64>,
    /// Per-coefficient minimum
    pub mfcc_min: Vec<f64>,
    /// Per-coefficient maximum
    pub mfcc_max: Vec<f64>,
    /// `[n_mfcc, frames]`
    pub shape: FeatureShape,
    /// Extractor coefficient count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_mfcc: Option<usize>,
    /// Extractor FFT size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_fft: Option<usize>,
    /// Extractor hop length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_length: Option<usize>,
}

/// `chroma` object of a feature record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromaRecord {
    /// Channel-major pitch-class matrix
    pub chroma: Vec<Vec<f64>>,
    /// Per-pitch-class mean
    pub chroma_mean: Vec<f64>,
    /// Per-pitch-class standard deviation
    pub chroma_std: Vec<f64>,
    /// Per-pitch-class minimum
    pub chroma_min: Vec<f64>,
    /// Per-pitch-class maximum
    pub chroma_max: Vec<f64>,
    /// `[12, frames]`
    pub shape: FeatureShape,
    /// Extractor pitch-class count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_chroma: Option<usize>,
    /// Pitch class names, C first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_classes: Option<Vec<String>>,
}

/// Pitch class names in chroma bin order
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

fn family_from_parts(
    family: &str,
    matrix: &[Vec<f64>],
    summary: FeatureSummary,
    shape: FeatureShape,
) -> Result<FeatureFamily, ComparisonError> {
    let actual_dimension = matrix.len();
    let actual_frames = matrix.first().map(|row| row.len()).unwrap_or(0);
    if actual_dimension != shape.dimension || actual_frames != shape.frame_count {
        return Err(ComparisonError::MalformedFeatureSet(format!(
            "{} shape says [{}, {}] but matrix is {}x{}",
            family, shape.dimension, shape.frame_count, actual_dimension, actual_frames
        )));
    }
    if matrix.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ComparisonError::MalformedFeatureSet(format!(
            "{} matrix contains non-finite values",
            family
        )));
    }

    let frames = FrameSequence::from_channel_major(matrix).map_err(|e| match e {
        // A ragged matrix is a record problem, not a caller dimension error
        ComparisonError::DimensionMismatch(msg) => {
            ComparisonError::MalformedFeatureSet(format!("{}: {}", family, msg))
        }
        other => other,
    })?;

    FeatureFamily::new(frames, summary).map_err(|e| match e {
        ComparisonError::MalformedFeatureSet(msg) => {
            ComparisonError::MalformedFeatureSet(format!("{}: {}", family, msg))
        }
        other => other,
    })
}

impl TryFrom<FeatureRecord> for AudioFeatureSet {
    type Error = ComparisonError;

    fn try_from(record: FeatureRecord) -> Result<Self, Self::Error> {
        let FeatureRecord {
            audio_info,
            mfcc,
            chroma,
            extraction_time,
        } = record;

        let timbral = family_from_parts(
            "mfcc",
            &mfcc.mfcc,
            FeatureSummary {
                mean: mfcc.mfcc_mean,
                std: mfcc.mfcc_std,
                min: mfcc.mfcc_min,
                max: mfcc.mfcc_max,
            },
            mfcc.shape,
        )?;
        let harmonic = family_from_parts(
            "chroma",
            &chroma.chroma,
            FeatureSummary {
                mean: chroma.chroma_mean,
                std: chroma.chroma_std,
                min: chroma.chroma_min,
                max: chroma.chroma_max,
            },
            chroma.shape,
        )?;

        let set = AudioFeatureSet::new(audio_info, timbral, harmonic)?;
        Ok(match extraction_time {
            Some(seconds) => set.with_extraction_time(seconds),
            None => set,
        })
    }
}

impl From<&AudioFeatureSet> for FeatureRecord {
    fn from(set: &AudioFeatureSet) -> Self {
        let timbral = set.timbral();
        let harmonic = set.harmonic();
        let t_summary = timbral.summary().clone();
        let h_summary = harmonic.summary().clone();

        FeatureRecord {
            audio_info: set.info().clone(),
            mfcc: MfccRecord {
                mfcc: timbral.frames().to_channel_major(),
                mfcc_mean: t_summary.mean,
                mfcc_std: t_summary.std,
                mfcc_min: t_summary.min,
                mfcc_max: t_summary.max,
                shape: timbral.frames().into(),
                n_mfcc: Some(timbral.frames().dimension()),
                n_fft: None,
                hop_length: None,
            },
            chroma: ChromaRecord {
                chroma: harmonic.frames().to_channel_major(),
                chroma_mean: h_summary.mean,
                chroma_std: h_summary.std,
                chroma_min: h_summary.min,
                chroma_max: h_summary.max,
                shape: harmonic.frames().into(),
                n_chroma: Some(harmonic.frames().dimension()),
                pitch_classes: (harmonic.frames().dimension() == PITCH_CLASSES.len())
                    .then(|| PITCH_CLASSES.iter().map(|p| p.to_string()).collect()),
            },
            extraction_time: set.extraction_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(mfcc_shape: &str) -> String {
        format!(
            r#"{{
                "audio_info": {{"filename": "a.wav", "duration": 1.5, "sample_rate": 22050,
                                "num_samples": 33075, "tempo": 0.0, "num_beats": 0}},
                "mfcc": {{"mfcc": [[1.0, 3.0], [2.0, 2.0]],
                          "mfcc_mean": [2.0, 2.0], "mfcc_std": [1.0, 0.0],
                          "mfcc_min": [1.0, 2.0], "mfcc_max": [3.0, 2.0],
                          "shape": {}, "n_mfcc": 2, "n_fft": 2048, "hop_length": 512}},
                "chroma": {{"chroma": [[0.5, 0.5]],
                            "chroma_mean": [0.5], "chroma_std": [0.0],
                            "chroma_min": [0.5], "chroma_max": [0.5],
                            "shape": [1, 2]}},
                "extraction_time": 0.25
            }}"#,
            mfcc_shape
        )
    }

    #[test]
    fn test_record_converts_channel_major() {
        let record: FeatureRecord = serde_json::from_str(&record_json("[2, 2]")).unwrap();
        let set = AudioFeatureSet::try_from(record).unwrap();
        assert_eq!(set.timbral().frames().n_frames(), 2);
        assert_eq!(set.timbral().frames().frame(0), &[1.0, 2.0]);
        assert_eq!(set.timbral().frames().frame(1), &[3.0, 2.0]);
        assert_eq!(set.info().filename.as_deref(), Some("a.wav"));
        assert_eq!(set.extraction_time(), Some(0.25));
    }

    #[test]
    fn test_inconsistent_shape_is_malformed() {
        let record: FeatureRecord = serde_json::from_str(&record_json("[2, 3]")).unwrap();
        assert!(matches!(
            AudioFeatureSet::try_from(record),
            Err(ComparisonError::MalformedFeatureSet(_))
        ));
    }

    #[test]
    fn test_record_roundtrip_through_feature_set() {
        let record: FeatureRecord = serde_json::from_str(&record_json("[2, 2]")).unwrap();
        let set = AudioFeatureSet::try_from(record).unwrap();
        let back = FeatureRecord::from(&set);
        assert_eq!(back.mfcc.mfcc, vec![vec![1.0, 3.0], vec![2.0, 2.0]]);
        assert_eq!(back.chroma.shape, FeatureShape { dimension: 1, frame_count: 2 });
        assert_eq!(back.chroma.pitch_classes, None);
    }
}

//! Feature data model
//!
//! A recording is reduced by an external extractor to two feature families:
//! timbral (MFCC, 13 coefficients per frame) and harmonic (chroma, 12 pitch
//! classes per frame). Each family is a [`FrameSequence`] plus its
//! [`FeatureSummary`]; both families together with [`AudioInfo`] form an
//! [`AudioFeatureSet`].

use crate::error::ComparisonError;
use serde::{Deserialize, Serialize};

/// Conventional frame dimension of the timbral (MFCC) family
pub const TIMBRAL_DIMENSION: usize = 13;

/// Conventional frame dimension of the harmonic (chroma) family
pub const HARMONIC_DIMENSION: usize = 12;

/// Ordered sequence of fixed-dimension frame vectors
///
/// Stored frame-major in one contiguous buffer: frame `t` occupies
/// `data[t * dimension..(t + 1) * dimension]`. Always holds at least one frame
/// of dimension at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    data: Vec<f64>,
    n_frames: usize,
    dimension: usize,
}

impl FrameSequence {
    /// Build a sequence from frame-major rows (one row per frame)
    ///
    /// # Errors
    ///
    /// - `EmptySequence` if `frames` is empty
    /// - `DimensionMismatch` if frames are zero-length or differ in length
    pub fn from_frames(frames: &[Vec<f64>]) -> Result<Self, ComparisonError> {
        let first = frames.first().ok_or_else(|| {
            ComparisonError::EmptySequence("frame sequence has no frames".to_string())
        })?;
        let dimension = first.len();
        if dimension == 0 {
            return Err(ComparisonError::DimensionMismatch(
                "frames must have at least one dimension".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(frames.len() * dimension);
        for (t, frame) in frames.iter().enumerate() {
            if frame.len() != dimension {
                return Err(ComparisonError::DimensionMismatch(format!(
                    "frame {} has {} values, expected {}",
                    t,
                    frame.len(),
                    dimension
                )));
            }
            data.extend_from_slice(frame);
        }

        Ok(Self {
            data,
            n_frames: frames.len(),
            dimension,
        })
    }

    /// Build a sequence from channel-major rows (one row per feature dimension,
    /// one column per frame), the layout produced by the extractor
    ///
    /// # Errors
    ///
    /// - `EmptySequence` if there are no rows or the rows have no columns
    /// - `DimensionMismatch` if rows differ in length
    pub fn from_channel_major(rows: &[Vec<f64>]) -> Result<Self, ComparisonError> {
        let dimension = rows.len();
        let n_frames = rows.first().map(|r| r.len()).unwrap_or(0);
        if dimension == 0 || n_frames == 0 {
            return Err(ComparisonError::EmptySequence(format!(
                "channel-major matrix {}x{} has no frames",
                dimension, n_frames
            )));
        }
        if let Some((d, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_frames) {
            return Err(ComparisonError::DimensionMismatch(format!(
                "channel {} has {} frames, expected {}",
                d,
                row.len(),
                n_frames
            )));
        }

        let mut data = vec![0.0; n_frames * dimension];
        for (d, row) in rows.iter().enumerate() {
            for (t, &value) in row.iter().enumerate() {
                data[t * dimension + d] = value;
            }
        }

        Ok(Self {
            data,
            n_frames,
            dimension,
        })
    }

    /// Build a sequence from a matrix of unknown orientation
    ///
    /// Feature matrices have far more frames than channels, so when the outer
    /// axis is shorter than the inner one the matrix is taken to be
    /// channel-major and transposed. Square matrices are read frame-major.
    ///
    /// # Errors
    ///
    /// Same as [`FrameSequence::from_frames`] / [`FrameSequence::from_channel_major`].
    pub fn from_matrix(rows: &[Vec<f64>]) -> Result<Self, ComparisonError> {
        let outer = rows.len();
        let inner = rows.first().map(|r| r.len()).unwrap_or(0);
        if outer < inner {
            log::debug!("Transposing {}x{} matrix to frame-major", outer, inner);
            Self::from_channel_major(rows)
        } else {
            Self::from_frames(rows)
        }
    }

    /// Treat a 1-D series as `values.len()` frames of dimension 1
    ///
    /// # Errors
    ///
    /// Returns `EmptySequence` if `values` is empty.
    pub fn from_samples(values: &[f64]) -> Result<Self, ComparisonError> {
        if values.is_empty() {
            return Err(ComparisonError::EmptySequence(
                "1-D series has no values".to_string(),
            ));
        }
        Ok(Self {
            data: values.to_vec(),
            n_frames: values.len(),
            dimension: 1,
        })
    }

    /// Number of frames (T)
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Frame dimension (D)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Borrow frame `t`
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_frames()`.
    pub fn frame(&self, t: usize) -> &[f64] {
        &self.data[t * self.dimension..(t + 1) * self.dimension]
    }

    /// Iterate over frames in time order
    pub fn frames(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dimension)
    }

    /// Contiguous frame-major buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy out as channel-major rows (D rows of T values)
    pub fn to_channel_major(&self) -> Vec<Vec<f64>> {
        (0..self.dimension)
            .map(|d| self.frames().map(|frame| frame[d]).collect())
            .collect()
    }

    /// Compute per-dimension statistics across time
    pub fn summary(&self) -> FeatureSummary {
        let dim = self.dimension;
        let count = self.n_frames as f64;

        let mut mean = vec![0.0; dim];
        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];
        for frame in self.frames() {
            for (d, &v) in frame.iter().enumerate() {
                mean[d] += v;
                min[d] = min[d].min(v);
                max[d] = max[d].max(v);
            }
        }
        for m in mean.iter_mut() {
            *m /= count;
        }

        // Population standard deviation (divide by T, not T - 1)
        let mut std = vec![0.0; dim];
        for frame in self.frames() {
            for (d, &v) in frame.iter().enumerate() {
                let diff = v - mean[d];
                std[d] += diff * diff;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / count).sqrt();
        }

        FeatureSummary { mean, std, min, max }
    }
}

/// Per-dimension statistics of a [`FrameSequence`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Mean across time
    pub mean: Vec<f64>,
    /// Population standard deviation across time
    pub std: Vec<f64>,
    /// Minimum across time
    pub min: Vec<f64>,
    /// Maximum across time
    pub max: Vec<f64>,
}

impl FeatureSummary {
    fn check_dimension(&self, dimension: usize) -> Result<(), ComparisonError> {
        let lengths = [
            ("mean", self.mean.len()),
            ("std", self.std.len()),
            ("min", self.min.len()),
            ("max", self.max.len()),
        ];
        for (name, len) in lengths {
            if len != dimension {
                return Err(ComparisonError::MalformedFeatureSet(format!(
                    "summary {} has {} values but frames have dimension {}",
                    name, len, dimension
                )));
            }
        }
        Ok(())
    }
}

/// One feature family of one recording: frames plus their summary
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFamily {
    frames: FrameSequence,
    summary: FeatureSummary,
}

impl FeatureFamily {
    /// Pair a sequence with an externally computed summary
    ///
    /// # Errors
    ///
    /// Returns `MalformedFeatureSet` if any summary vector's length differs from
    /// the sequence dimension.
    pub fn new(frames: FrameSequence, summary: FeatureSummary) -> Result<Self, ComparisonError> {
        summary.check_dimension(frames.dimension())?;
        Ok(Self { frames, summary })
    }

    /// Derive the summary from the frames themselves
    pub fn from_frames(frames: FrameSequence) -> Self {
        let summary = frames.summary();
        Self { frames, summary }
    }

    /// Time series of frames
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    /// Summary statistics
    pub fn summary(&self) -> &FeatureSummary {
        &self.summary
    }

    /// Mean vector, the input to the coarse cosine/Euclidean comparison
    pub fn mean(&self) -> &[f64] {
        &self.summary.mean
    }
}

/// Scalar metadata about the source recording
///
/// Field names on the wire follow the extractor's `audio_info` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Source file name, if the extractor recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of decoded samples, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_samples: Option<u64>,

    /// Tempo estimate in BPM (0.0 = no clear beat detected)
    #[serde(rename = "tempo")]
    pub tempo_bpm: f64,

    /// Number of detected beats
    #[serde(rename = "num_beats")]
    pub beat_count: u32,
}

impl AudioInfo {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `MalformedFeatureSet` for negative or non-finite duration/tempo.
    pub fn validate(&self) -> Result<(), ComparisonError> {
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(ComparisonError::MalformedFeatureSet(format!(
                "duration must be finite and non-negative, got {}",
                self.duration_seconds
            )));
        }
        if !self.tempo_bpm.is_finite() || self.tempo_bpm < 0.0 {
            return Err(ComparisonError::MalformedFeatureSet(format!(
                "tempo must be finite and non-negative, got {}",
                self.tempo_bpm
            )));
        }
        Ok(())
    }

    /// Whether the extractor found a usable beat
    pub fn has_beat(&self) -> bool {
        self.tempo_bpm > 0.0
    }
}

/// All features extracted from one recording
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFeatureSet {
    info: AudioInfo,
    timbral: FeatureFamily,
    harmonic: FeatureFamily,
    extraction_time: Option<f64>,
}

impl AudioFeatureSet {
    /// Assemble a feature set
    ///
    /// Non-standard family dimensions are accepted (extractors may be configured
    /// with a different coefficient count) but logged.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFeatureSet` if `info` is out of range.
    pub fn new(
        info: AudioInfo,
        timbral: FeatureFamily,
        harmonic: FeatureFamily,
    ) -> Result<Self, ComparisonError> {
        info.validate()?;

        if timbral.frames().dimension() != TIMBRAL_DIMENSION {
            log::warn!(
                "Timbral family has dimension {} (expected {} coefficients)",
                timbral.frames().dimension(),
                TIMBRAL_DIMENSION
            );
        }
        if harmonic.frames().dimension() != HARMONIC_DIMENSION {
            log::warn!(
                "Harmonic family has dimension {} (expected {} pitch classes)",
                harmonic.frames().dimension(),
                HARMONIC_DIMENSION
            );
        }

        Ok(Self {
            info,
            timbral,
            harmonic,
            extraction_time: None,
        })
    }

    /// Attach the extractor's wall-clock time in seconds
    pub fn with_extraction_time(mut self, seconds: f64) -> Self {
        self.extraction_time = Some(seconds);
        self
    }

    /// Recording metadata
    pub fn info(&self) -> &AudioInfo {
        &self.info
    }

    /// Timbral (MFCC) family
    pub fn timbral(&self) -> &FeatureFamily {
        &self.timbral
    }

    /// Harmonic (chroma) family
    pub fn harmonic(&self) -> &FeatureFamily {
        &self.harmonic
    }

    /// Extraction time in seconds, if recorded
    pub fn extraction_time(&self) -> Option<f64> {
        self.extraction_time
    }
}

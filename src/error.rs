//! Error types for the similarity engine

use std::fmt;

/// Errors that can occur while comparing feature sets
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// Vector or matrix dimensions are incompatible under a strict length policy
    DimensionMismatch(String),

    /// A frame sequence has no frames
    EmptySequence(String),

    /// A feature set is missing data or carries inconsistent shape metadata
    MalformedFeatureSet(String),

    /// Invalid configuration or caller-supplied limits exceeded
    InvalidInput(String),

    /// Reading or writing a feature/result record failed
    IoError(String),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::DimensionMismatch(msg) => write!(f, "Dimension mismatch: {}", msg),
            ComparisonError::EmptySequence(msg) => write!(f, "Empty sequence: {}", msg),
            ComparisonError::MalformedFeatureSet(msg) => {
                write!(f, "Malformed feature set: {}", msg)
            }
            ComparisonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ComparisonError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ComparisonError {}

impl From<std::io::Error> for ComparisonError {
    fn from(err: std::io::Error) -> Self {
        ComparisonError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ComparisonError {
    fn from(err: serde_json::Error) -> Self {
        // Syntax, missing keys and wrong types all mean the record itself is bad.
        if err.is_io() {
            ComparisonError::IoError(err.to_string())
        } else {
            ComparisonError::MalformedFeatureSet(err.to_string())
        }
    }
}

//! Feature and result record I/O
//!
//! Loading happens before the engine runs; nothing in `features` or `analysis`
//! touches the filesystem.

pub mod record;

use crate::analysis::result::ComparisonResult;
use crate::error::ComparisonError;
use crate::features::AudioFeatureSet;
use record::FeatureRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Parse a feature record from a JSON string
///
/// # Errors
///
/// Returns `MalformedFeatureSet` for missing keys, wrong types or inconsistent shapes.
pub fn parse_feature_set(json: &str) -> Result<AudioFeatureSet, ComparisonError> {
    let record: FeatureRecord = serde_json::from_str(json)?;
    AudioFeatureSet::try_from(record)
}

/// Load a feature record from a JSON file
///
/// # Errors
///
/// - `IoError` if the file cannot be opened or read
/// - `MalformedFeatureSet` if its content is not a valid feature record
pub fn load_feature_set<P: AsRef<Path>>(path: P) -> Result<AudioFeatureSet, ComparisonError> {
    let path = path.as_ref();
    log::debug!("Loading feature record from {}", path.display());
    let file = File::open(path)
        .map_err(|e| ComparisonError::IoError(format!("{}: {}", path.display(), e)))?;
    let record: FeatureRecord = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        match ComparisonError::from(e) {
            ComparisonError::MalformedFeatureSet(msg) => {
                ComparisonError::MalformedFeatureSet(format!("{}: {}", path.display(), msg))
            }
            other => other,
        }
    })?;
    AudioFeatureSet::try_from(record)
}

/// Write a feature set in the extractor's JSON layout (pretty-printed)
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be written.
pub fn save_feature_set<P: AsRef<Path>>(
    set: &AudioFeatureSet,
    path: P,
) -> Result<(), ComparisonError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &FeatureRecord::from(set))?;
    writer.flush()?;
    log::debug!("Saved feature record to {}", path.display());
    Ok(())
}

/// Serialize a comparison result to pretty JSON
///
/// # Errors
///
/// Returns `IoError` if serialization fails.
pub fn result_to_json(result: &ComparisonResult) -> Result<String, ComparisonError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ComparisonError::IoError(format!("serializing result: {}", e)))
}

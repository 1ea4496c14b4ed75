//! JSON snapshots of whole spectra.
//!
//! The snapshot is serde's derived representation of [`SpectrumData`]:
//! caches, observers and the converter registry are not stored and come back
//! with their defaults. Omitted values are written as `null`. Loading checks
//! the structural invariants before handing the dataset out.

use std::fs;
use std::path::Path;

use crate::spectrum::SpectrumData;

/// Errors that can occur while writing or reading a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing/deserializing JSON
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot decoded but violates a dataset invariant
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

/// Serialize a spectrum to pretty-printed JSON
pub fn to_json_string(spectrum: &SpectrumData) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(spectrum)?)
}

/// Deserialize and validate a spectrum
pub fn from_json_str(json: &str) -> Result<SpectrumData, SnapshotError> {
    let spectrum: SpectrumData = serde_json::from_str(json)?;
    spectrum
        .check_consistency()
        .map_err(SnapshotError::Invalid)?;
    Ok(spectrum)
}

/// Write a snapshot file
pub fn save(spectrum: &SpectrumData, path: &Path) -> Result<(), SnapshotError> {
    let json = to_json_string(spectrum)?;
    fs::write(path, json)?;
    log::info!(
        "saved spectrum {} ({} sections) to {}",
        spectrum.id(),
        spectrum.section_count(),
        path.display()
    );
    Ok(())
}

/// Read a snapshot file
pub fn load(path: &Path) -> Result<SpectrumData, SnapshotError> {
    let json = fs::read_to_string(path)?;
    let spectrum = from_json_str(&json)?;
    log::debug!(
        "loaded spectrum {} ({} sections) from {}",
        spectrum.id(),
        spectrum.section_count(),
        path.display()
    );
    Ok(spectrum)
}

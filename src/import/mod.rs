//! Reading Import
//!
//! Loads reading histories exported from the reading store:
//!
//! - **csv_import**: header-mapped CSV files
//! - JSON arrays of reading objects (camelCase or snake_case keys)
//!
//! Values that are not numeric load as missing rather than failing the file.

mod csv_import;

pub use csv_import::{CsvImportResult, CsvImporter};

use crate::readings::Reading;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading readings
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
}

/// Parse a JSON array of readings
pub fn readings_from_json(json: &str) -> Result<Vec<Reading>, ImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Load readings from a `.csv` or `.json` file
pub fn load_readings(path: &Path) -> Result<Vec<Reading>, ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let readings = match extension.as_str() {
        "json" => readings_from_json(&std::fs::read_to_string(path)?)?,
        "csv" => {
            let result = CsvImporter::new().import(path)?;
            for error in &result.errors {
                tracing::warn!(file = %path.display(), "{}", error);
            }
            result.readings
        }
        other => return Err(ImportError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(file = %path.display(), readings = readings.len(), "Loaded readings");
    Ok(readings)
}

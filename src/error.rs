use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for mirdoc operations.
#[derive(Debug, Error)]
pub enum MirdocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write document JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse lab file {path} at line {line}: {message}")]
    LabParse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Malformed namespace schema: {0}")]
    SchemaParse(String),

    #[error("Namespace '{0}' is already registered")]
    DuplicateNamespace(String),

    #[error("Unknown namespace '{0}'")]
    UnknownNamespace(String),

    #[error("File metadata conflict; resolve manually or merge with ConflictPolicy::Overwrite")]
    MetadataConflict,

    #[error("Invalid trim range: start {start} must be non-negative and less than end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

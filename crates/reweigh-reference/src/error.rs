//! Error types for reference source resolution and loading.

use std::path::PathBuf;
use thiserror::Error;

use reweigh_model::ModelError;

/// Errors that can occur when resolving or loading reference distributions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReferenceError {
    /// No built-in source matches the requested label.
    #[error("unknown reference source '{label}' (available: {available})")]
    UnknownSource { label: String, available: String },

    /// Reference file not found.
    #[error("reference file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read reference file.
    #[error("failed to read reference file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a CSV record.
    #[error("failed to parse reference CSV {origin}: {source}")]
    CsvParse {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// A value column did not hold a number.
    #[error("invalid value '{value}' for {attribute}/{category} in {origin}")]
    InvalidValue {
        origin: String,
        attribute: String,
        category: String,
        value: String,
    },

    /// The file parsed but contained no reference rows.
    #[error("reference source {origin} contains no rows")]
    EmptySource { origin: String },

    /// A table failed distribution validation.
    #[error("invalid reference table in {origin}: {source}")]
    Distribution {
        origin: String,
        #[source]
        source: ModelError,
    },
}

/// Result type for reference operations.
pub type Result<T> = std::result::Result<T, ReferenceError>;

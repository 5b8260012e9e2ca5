//! Error types for dataset ingestion and export.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or exporting a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Dataset file not found.
    #[error("dataset file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write an output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// Failed to parse the delimited file with Polars.
    #[error("failed to parse dataset {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Dataset has a header but no data rows (or no content at all).
    #[error("dataset is empty: {path}")]
    EmptyDataset { path: PathBuf },

    /// A header cell is blank.
    #[error("dataset has an empty column name: {path}")]
    EmptyColumnName { path: PathBuf },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// Weight vector does not line up with the dataset rows.
    #[error("weights length {weights} does not match dataset height {rows}")]
    LengthMismatch { weights: usize, rows: usize },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

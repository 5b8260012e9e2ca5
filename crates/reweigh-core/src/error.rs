use std::path::PathBuf;

use thiserror::Error;

use reweigh_ingest::IngestError;

/// Errors raised by detection, comparison, and weight computation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("column '{column}' not found in dataset")]
    ColumnNotFound { column: String },
    #[error("column '{column}' has no non-missing values")]
    EmptyColumn { column: String },
    #[error("row {row} produced a non-finite or non-positive weight ({value})")]
    NonFiniteWeight { row: usize, value: f64 },
    #[error("invalid engine configuration: {message}")]
    InvalidConfig { message: String },
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {origin}: {source}")]
    ConfigParse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Ingest(IngestError),
}

impl From<IngestError> for EngineError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::ColumnNotFound { column } => Self::ColumnNotFound { column },
            other => Self::Ingest(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

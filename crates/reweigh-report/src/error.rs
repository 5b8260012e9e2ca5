use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("weight vector has {weights} entries but the dataset has {rows} rows")]
    ShapeMismatch { weights: usize, rows: usize },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

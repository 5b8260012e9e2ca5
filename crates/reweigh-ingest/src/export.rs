//! Weighted dataset export.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Name of the column that carries per-row correction weights.
pub const WEIGHTS_COLUMN: &str = "Weights";

/// Return a copy of `df` with the weights appended as a `Weights` column.
///
/// An existing `Weights` column is replaced. The input frame is left untouched.
pub fn with_weights_column(df: &DataFrame, weights: &[f64]) -> Result<DataFrame> {
    if weights.len() != df.height() {
        return Err(IngestError::LengthMismatch {
            weights: weights.len(),
            rows: df.height(),
        });
    }
    let mut weighted = df.clone();
    let column = Column::new(WEIGHTS_COLUMN.into(), weights.to_vec());
    weighted.with_column(column)?;
    Ok(weighted)
}

/// Write a DataFrame as comma-separated text with a header row.
pub fn write_dataset_csv(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut output = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut output)?;
    tracing::debug!(path = %path.display(), rows = output.height(), "dataset written");
    Ok(())
}

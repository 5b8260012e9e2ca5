//! Dataset ingestion for the reweighting engine.
//!
//! This crate loads delimited text files into Polars DataFrames, converts
//! cells into category values, and writes datasets back out with an added
//! `Weights` column.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use reweigh_ingest::{read_dataset, column_categories, with_weights_column};
//!
//! let df = read_dataset(Path::new("patients.csv"))?;
//! let zips = column_categories(&df, "zip")?;
//! let weighted = with_weights_column(&df, &vec![1.0; df.height()])?;
//! ```

mod csv;
mod error;
mod export;
mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use csv::{
    ReadOptions, read_dataset, read_dataset_with_options, validate_dataframe_shape,
    validate_encoding,
};

// === Category Values ===
pub use values::{any_to_string, category_value, column_categories, column_names, format_numeric};

// === Export ===
pub use export::{WEIGHTS_COLUMN, with_weights_column, write_dataset_csv};

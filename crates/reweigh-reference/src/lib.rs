//! Reference ("ground truth") distributions for representativeness checks.
//!
//! This crate provides:
//!
//! - the [`ReferenceProvider`] trait the engine queries per attribute,
//! - [`ReferenceCatalog`], an immutable in-memory provider,
//! - the embedded **US Census** source,
//! - a loader for external reference CSV files.
//!
//! # Example
//!
//! ```rust,ignore
//! use reweigh_reference::{builtin_source, ReferenceProvider};
//!
//! let census = builtin_source("US Census")?;
//! let zips = census.reference("geography").expect("census has geography");
//! println!("{} categories", zips.len());
//! ```

pub mod embedded;
pub mod error;
pub mod loader;
pub mod provider;

pub use embedded::{BUILTIN_SOURCES, BuiltinSource, DEFAULT_SOURCE, builtin_source, find_builtin};
pub use error::{ReferenceError, Result};
pub use loader::{load_catalog_from_str, load_reference_csv};
pub use provider::{ReferenceCatalog, ReferenceProvider};

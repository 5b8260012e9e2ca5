//! Report generation for representativeness evaluations.
//!
//! - [`render_markdown`]: human-readable report with rounded values
//! - [`ReportPayload`] / [`write_report_json`]: structured report
//! - [`write_weights_json`]: the raw weight vector

pub mod error;
pub mod json;
pub mod markdown;

use std::path::Path;

pub use error::{ReportError, Result};
pub use json::{
    AttributeReport, CategoryReport, ReportPayload, write_report_json, write_weights_json,
};
pub use markdown::{WeightedShares, ensure_aligned, render_markdown};

/// Write the markdown report to `path`.
pub fn write_markdown(path: &Path, markdown: &str) -> Result<()> {
    json::write_text(path, markdown)
}

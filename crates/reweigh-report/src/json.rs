//! Machine-readable report and weights artifacts.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use reweigh_model::{
    AttributeResult, EvaluationResult, ReferenceOrigin, WeightAnomaly, WeightSummary,
};

use crate::error::{ReportError, Result};
use crate::markdown::{WeightedShares, ensure_aligned};

const REPORT_SCHEMA: &str = "reweigh.bias-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub schema: String,
    pub schema_version: u32,
    pub generated_at: String,
    pub source: String,
    pub row_count: usize,
    pub rebalanced: bool,
    pub attributes: BTreeMap<String, AttributeReport>,
    pub summary: Option<WeightSummary>,
    pub anomalies: Vec<WeightAnomaly>,
    /// Markdown rendering of the same evaluation.
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    pub label: String,
    pub column: Option<String>,
    pub status: String,
    pub imbalanced: bool,
    pub categories: BTreeMap<String, CategoryReport>,
}

/// Full-precision values for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Raw spellings in the data counted under this category.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
    pub count: usize,
    pub observed_pct: f64,
    pub reference_pct: f64,
    pub reference_source: ReferenceOrigin,
    pub weight: f64,
    pub weighted_pct: Option<f64>,
}

impl ReportPayload {
    pub fn new(result: &EvaluationResult, shares: &WeightedShares, narrative: String) -> Self {
        let attributes = result
            .attributes
            .iter()
            .map(|entry| {
                let report = AttributeReport {
                    label: entry.label.clone(),
                    column: entry.outcome.column().map(str::to_string),
                    status: entry.outcome.status().to_string(),
                    imbalanced: entry.is_imbalanced(),
                    categories: category_reports(entry, shares.get(&entry.attribute)),
                };
                (entry.attribute.clone(), report)
            })
            .collect();

        Self {
            schema: REPORT_SCHEMA.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            source: result.source.clone(),
            row_count: result.row_count,
            rebalanced: result.rebalanced(),
            attributes,
            summary: result.summary(),
            anomalies: result.anomalies.clone(),
            narrative,
        }
    }
}

fn category_reports(
    entry: &AttributeResult,
    shares: Option<&BTreeMap<String, f64>>,
) -> BTreeMap<String, CategoryReport> {
    let Some(comparison) = entry.outcome.comparison() else {
        return BTreeMap::new();
    };
    comparison
        .categories
        .iter()
        .map(|category| {
            let weight = entry
                .outcome
                .weights()
                .map_or(1.0, |weights| weights.multiplier(&category.category));
            let weighted_pct = shares
                .and_then(|shares| shares.get(&category.category))
                .map(|share| share * 100.0);
            let report = CategoryReport {
                variants: category.variants.clone(),
                count: category.count,
                observed_pct: category.observed_pct(),
                reference_pct: category.reference_pct(),
                reference_source: category.origin,
                weight,
                weighted_pct,
            };
            (category.category.clone(), report)
        })
        .collect()
}

/// Write the JSON report to `path`.
pub fn write_report_json(path: &Path, payload: &ReportPayload) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    write_text(path, &format!("{json}\n"))
}

/// Write the weight vector as a JSON array of floats in row order.
pub fn write_weights_json(path: &Path, result: &EvaluationResult) -> Result<()> {
    ensure_aligned(result)?;
    let json = serde_json::to_string(&result.weights)?;
    write_text(path, &format!("{json}\n"))
}

pub(crate) fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "report artifact written");
    Ok(())
}

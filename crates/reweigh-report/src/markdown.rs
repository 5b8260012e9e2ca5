//! Markdown rendering of an evaluation.
//!
//! All rounding happens here: percentages are shown with two decimals and
//! weights with three. The evaluation itself keeps full precision.

use std::collections::BTreeMap;

use reweigh_model::{
    AttributeComparison, AttributeOutcome, AttributeResult, EvaluationResult, ReferenceOrigin,
};

use crate::error::{ReportError, Result};

/// Weighted category shares per attribute, as produced after correction.
pub type WeightedShares = BTreeMap<String, BTreeMap<String, f64>>;

/// Check that the weight vector lines up with the dataset rows.
pub fn ensure_aligned(result: &EvaluationResult) -> Result<()> {
    if result.weights.len() != result.row_count {
        return Err(ReportError::ShapeMismatch {
            weights: result.weights.len(),
            rows: result.row_count,
        });
    }
    Ok(())
}

/// Render the evaluation as a markdown document.
///
/// `shares` supplies the post-correction share of each category; attributes
/// missing from it render `-` in the weighted column.
pub fn render_markdown(result: &EvaluationResult, shares: &WeightedShares) -> Result<String> {
    ensure_aligned(result)?;

    let mut md = String::new();
    md.push_str("# Bias Evaluation Report\n\n");
    md.push_str(&format!("**Ground Truth Source:** {}\n\n", result.source));
    md.push_str(&format!("**Rows Evaluated:** {}\n\n", result.row_count));

    for entry in &result.attributes {
        md.push_str(&format!("## {}\n\n", entry.label));
        match &entry.outcome {
            AttributeOutcome::Corrected { comparison, .. } => {
                let attribute_shares = shares.get(&entry.attribute);
                render_corrected(&mut md, entry, comparison, &result.source, attribute_shares);
            }
            AttributeOutcome::NotDetected => {
                md.push_str(&format!(
                    "{}: attribute not detected; no correction applied for this dimension.\n\n",
                    entry.label
                ));
            }
            AttributeOutcome::NoReference { column } => {
                md.push_str(&format!("**Column Used:** `{column}`\n\n"));
                md.push_str(&format!(
                    "No reference available for {} in {}; \
                     no correction applied for this dimension.\n\n",
                    entry.label, result.source
                ));
            }
            AttributeOutcome::NoValues { column } => {
                md.push_str(&format!("**Column Used:** `{column}`\n\n"));
                md.push_str(&format!(
                    "{}: every row in `{column}` is empty; \
                     no correction applied for this dimension.\n\n",
                    entry.label
                ));
            }
        }
    }

    if !result.anomalies.is_empty() {
        md.push_str("## Weight Anomalies\n\n");
        md.push_str(
            "The following categories produced an unusable correction ratio; \
             their weight was reset to 1.0.\n\n",
        );
        md.push_str("| Attribute | Category | Reason |\n|---|---|---|\n");
        for anomaly in &result.anomalies {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_cell(&anomaly.attribute),
                escape_cell(&anomaly.category),
                escape_cell(&anomaly.reason)
            ));
        }
        md.push('\n');
    }

    if result.rebalanced()
        && let Some(summary) = result.summary()
    {
        md.push_str("## Weight Summary\n\n");
        md.push_str("| Min | Max | Mean | Effective Sample Size |\n|---|---|---|---|\n");
        md.push_str(&format!(
            "| {:.3} | {:.3} | {:.3} | {:.2} |\n\n",
            summary.min, summary.max, summary.mean, summary.effective_sample_size
        ));
    }

    md.push_str("---\n");
    if result.rebalanced() {
        md.push_str(
            "**A new `Weights` column is available for preview and can be added to your data.**\n",
        );
    } else {
        md.push_str("**No rebalancing performed; all weights are 1.0.**\n");
    }
    Ok(md)
}

fn render_corrected(
    md: &mut String,
    entry: &AttributeResult,
    comparison: &AttributeComparison,
    source: &str,
    shares: Option<&BTreeMap<String, f64>>,
) {
    md.push_str(&format!("**Column Used:** `{}`\n\n", comparison.column()));
    md.push_str(&format!(
        "| {} | % in Data | % in {} | Weight | Weighted % |\n|---|---|---|---|---|\n",
        escape_cell(&entry.label),
        escape_cell(source)
    ));
    for category in &comparison.categories {
        let marker = if category.origin == ReferenceOrigin::Floor {
            " *"
        } else {
            ""
        };
        let weighted = shares
            .and_then(|shares| shares.get(&category.category))
            .map_or_else(|| "-".to_string(), |share| format!("{:.2}", share * 100.0));
        let weight = entry
            .outcome
            .weights()
            .map_or(1.0, |weights| weights.multiplier(&category.category));
        md.push_str(&format!(
            "| {}{} | {:.2} | {:.2} | {:.3} | {} |\n",
            escape_cell(&category.category),
            marker,
            category.observed_pct(),
            category.reference_pct(),
            weight,
            weighted
        ));
    }
    md.push('\n');

    for category in comparison
        .categories
        .iter()
        .filter(|category| !category.variants.is_empty())
    {
        let spellings: Vec<String> = category
            .variants
            .iter()
            .map(|variant| format!("`{variant}`"))
            .collect();
        md.push_str(&format!(
            "Counted as {}: {}.\n\n",
            escape_cell(&category.category),
            spellings.join(", ")
        ));
    }

    if let Some(floor) = comparison.floor_categories().next() {
        md.push_str(&format!(
            "\\* Not present in the reference source; \
             a floor proportion of {} was substituted.\n\n",
            floor.reference
        ));
    }

    if comparison.missing > 0 {
        md.push_str(&format!(
            "{} rows had no value in `{}` and keep a multiplier of 1.0 for this attribute.\n\n",
            comparison.missing,
            comparison.column()
        ));
    }

    if entry.is_imbalanced() {
        md.push_str(&format!(
            "*{} is not balanced against {}: the largest deviation is {:.2} percentage points \
             (threshold {}). Suggested weights:*\n\n",
            entry.label,
            source,
            comparison.max_deviation_pct(),
            entry.imbalance_threshold_pct
        ));
        md.push_str(&format!("| {} | Weight |\n|---|---|\n", escape_cell(&entry.label)));
        if let Some(weights) = entry.outcome.weights() {
            for category in &comparison.categories {
                md.push_str(&format!(
                    "| {} | {:.3} |\n",
                    escape_cell(&category.category),
                    weights.multiplier(&category.category)
                ));
            }
        }
        md.push('\n');
    } else {
        md.push_str(&format!("*{} is approximately balanced.*\n\n", entry.label));
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

//! Detect, compare, and weigh in one call.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use reweigh_model::{AttributeOutcome, AttributeResult, EvaluationResult, WeightMap};
use reweigh_reference::ReferenceProvider;

use crate::compare::{compare_observed, tally_column};
use crate::config::EngineConfig;
use crate::detect::detect_all;
use crate::error::{EngineError, Result};
use crate::registry::AttributeRegistry;
use crate::weights::{compute_weights, weight_map};

/// Evaluate `df` against `provider` for every attribute in `registry`.
///
/// The frame is only borrowed. Results follow registry order. Attributes with
/// no matching column, no reference table, or a matching column without any
/// values are reported as outcomes and do not affect the weights; when none
/// is corrected every weight is 1.0.
pub fn evaluate(
    df: &DataFrame,
    registry: &AttributeRegistry,
    provider: &dyn ReferenceProvider,
    config: &EngineConfig,
) -> Result<EvaluationResult> {
    config.validate()?;
    let row_count = df.height();
    if row_count == 0 {
        return Err(EngineError::EmptyDataset);
    }

    let evaluate_span = info_span!(
        "evaluate",
        source = %provider.label(),
        rows = row_count,
        attributes = registry.len()
    );
    let _evaluate_guard = evaluate_span.enter();
    let start = Instant::now();

    let bindings = info_span!("detect").in_scope(|| detect_all(df, registry, config))?;

    let mut attributes = Vec::with_capacity(registry.len());
    let mut anomalies = Vec::new();
    for (spec, binding) in registry.iter().zip(bindings) {
        let outcome = match binding {
            None => {
                debug!(attribute = %spec.name, "attribute not detected");
                AttributeOutcome::NotDetected
            }
            Some(binding) => match provider.reference(&spec.name) {
                None => {
                    debug!(
                        attribute = %spec.name,
                        column = %binding.column,
                        "no reference table for attribute"
                    );
                    AttributeOutcome::NoReference {
                        column: binding.column,
                    }
                }
                Some(reference) => {
                    let observed = tally_column(df, &binding.column)?;
                    if observed.is_empty() {
                        warn!(
                            attribute = %spec.name,
                            column = %binding.column,
                            missing = observed.missing,
                            "bound column has no values; attribute left uncorrected"
                        );
                        AttributeOutcome::NoValues {
                            column: binding.column,
                        }
                    } else {
                        let comparison = info_span!("compare", attribute = %spec.name)
                            .in_scope(|| compare_observed(&binding, &observed, reference, config));
                        let (weights, mut found) = weight_map(&comparison);
                        debug!(
                            attribute = %spec.name,
                            column = %binding.column,
                            categories = comparison.categories.len(),
                            max_deviation_pct = comparison.max_deviation_pct(),
                            "attribute compared"
                        );
                        anomalies.append(&mut found);
                        AttributeOutcome::Corrected {
                            comparison,
                            weights,
                        }
                    }
                }
            },
        };
        attributes.push(AttributeResult {
            attribute: spec.name.clone(),
            label: spec.display_label().to_string(),
            imbalance_threshold_pct: spec.imbalance_threshold_pct,
            outcome,
        });
    }

    let corrections: Vec<(&str, &WeightMap)> = attributes
        .iter()
        .filter_map(|entry| match &entry.outcome {
            AttributeOutcome::Corrected {
                comparison,
                weights,
            } => Some((comparison.column(), weights)),
            _ => None,
        })
        .collect();
    let weights = info_span!("weigh").in_scope(|| compute_weights(df, &corrections))?;

    let result = EvaluationResult {
        source: provider.label().to_string(),
        row_count,
        attributes,
        weights,
        anomalies,
    };
    info!(
        rows = row_count,
        corrected = result.corrected().count(),
        anomalies = result.anomalies.len(),
        rebalanced = result.rebalanced(),
        duration_ms = start.elapsed().as_millis(),
        "evaluation complete"
    );
    Ok(result)
}

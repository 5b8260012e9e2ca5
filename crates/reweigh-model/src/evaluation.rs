//! Evaluation results produced by the weight engine.

use serde::{Deserialize, Serialize};

use crate::comparison::AttributeComparison;
use crate::distribution::WeightMap;

/// Outcome for one registered attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttributeOutcome {
    /// Bound, compared, and folded into the row weights.
    Corrected {
        comparison: AttributeComparison,
        weights: WeightMap,
    },
    /// No column matched the attribute.
    NotDetected,
    /// A column matched but the reference source has no table for the attribute.
    NoReference { column: String },
    /// A column matched but every cell in it is null or blank.
    NoValues { column: String },
}

impl AttributeOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            AttributeOutcome::Corrected { .. } => "corrected",
            AttributeOutcome::NotDetected => "not_detected",
            AttributeOutcome::NoReference { .. } => "no_reference",
            AttributeOutcome::NoValues { .. } => "no_values",
        }
    }

    pub fn comparison(&self) -> Option<&AttributeComparison> {
        match self {
            AttributeOutcome::Corrected { comparison, .. } => Some(comparison),
            _ => None,
        }
    }

    /// Bound column, for every outcome except [`AttributeOutcome::NotDetected`].
    pub fn column(&self) -> Option<&str> {
        match self {
            AttributeOutcome::Corrected { comparison, .. } => Some(comparison.column()),
            AttributeOutcome::NoReference { column } | AttributeOutcome::NoValues { column } => {
                Some(column)
            }
            AttributeOutcome::NotDetected => None,
        }
    }

    pub fn weights(&self) -> Option<&WeightMap> {
        match self {
            AttributeOutcome::Corrected { weights, .. } => Some(weights),
            _ => None,
        }
    }
}

/// Result entry for one registered attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeResult {
    pub attribute: String,
    pub label: String,
    /// Deviation (percentage points) above which the report flags an imbalance.
    pub imbalance_threshold_pct: f64,
    pub outcome: AttributeOutcome,
}

impl AttributeResult {
    pub fn is_imbalanced(&self) -> bool {
        self.outcome
            .comparison()
            .is_some_and(|comparison| comparison.is_imbalanced(self.imbalance_threshold_pct))
    }
}

/// A category whose correction ratio was unusable and was reset to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightAnomaly {
    pub attribute: String,
    pub category: String,
    pub reason: String,
}

/// Descriptive statistics of a weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    /// Kish effective sample size, `(sum w)^2 / sum w^2`.
    pub effective_sample_size: f64,
}

impl WeightSummary {
    /// Summarize a weight vector; `None` when it is empty.
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &weight in weights {
            min = min.min(weight);
            max = max.max(weight);
            sum += weight;
            sum_sq += weight * weight;
        }
        let effective_sample_size = if sum_sq > 0.0 { sum * sum / sum_sq } else { 0.0 };
        Some(Self {
            min,
            max,
            mean: sum / weights.len() as f64,
            sum,
            effective_sample_size,
        })
    }
}

/// Everything produced by a single evaluation call.
///
/// `weights` is positionally aligned with the dataset rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Reference source label (e.g. "US Census").
    pub source: String,
    pub row_count: usize,
    pub attributes: Vec<AttributeResult>,
    pub weights: Vec<f64>,
    pub anomalies: Vec<WeightAnomaly>,
}

impl EvaluationResult {
    /// False when no attribute was corrected and every weight is 1.0 by default.
    pub fn rebalanced(&self) -> bool {
        self.attributes
            .iter()
            .any(|entry| matches!(entry.outcome, AttributeOutcome::Corrected { .. }))
    }

    pub fn corrected(&self) -> impl Iterator<Item = &AttributeComparison> {
        self.attributes
            .iter()
            .filter_map(|entry| entry.outcome.comparison())
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeResult> {
        self.attributes.iter().find(|entry| entry.attribute == name)
    }

    pub fn summary(&self) -> Option<WeightSummary> {
        WeightSummary::from_weights(&self.weights)
    }
}

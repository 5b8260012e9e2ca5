//! Observed-versus-reference comparison for a bound attribute.

use serde::{Deserialize, Serialize};

use crate::binding::AttributeBinding;

/// Where a category's reference proportion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceOrigin {
    /// Found in the reference table.
    Table,
    /// Absent from the reference table; the floor proportion was substituted.
    Floor,
}

/// One observed category paired with its reference proportion.
///
/// Proportions are kept at full precision. Rounding for display happens in the
/// report renderer only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    /// Reference table category, or the raw value when the table lacks it.
    pub category: String,
    /// Other raw spellings in the data counted under `category` (e.g. `F`, `female`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
    pub count: usize,
    pub observed: f64,
    pub reference: f64,
    pub origin: ReferenceOrigin,
}

impl CategoryComparison {
    /// True when the raw cell `value` was counted under this category.
    pub fn covers(&self, value: &str) -> bool {
        self.category == value || self.variants.iter().any(|variant| variant == value)
    }

    pub fn observed_pct(&self) -> f64 {
        self.observed * 100.0
    }

    pub fn reference_pct(&self) -> f64 {
        self.reference * 100.0
    }

    /// Absolute deviation between observed and reference, in percentage points.
    pub fn deviation_pct(&self) -> f64 {
        (self.observed_pct() - self.reference_pct()).abs()
    }

    /// Raw correction ratio; may be non-finite and is sanitized by the weight engine.
    pub fn ratio(&self) -> f64 {
        self.reference / self.observed
    }
}

/// Comparison of one bound attribute against its reference distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeComparison {
    pub binding: AttributeBinding,
    pub reference_label: String,
    pub non_missing: usize,
    pub missing: usize,
    pub categories: Vec<CategoryComparison>,
}

impl AttributeComparison {
    pub fn attribute(&self) -> &str {
        &self.binding.attribute
    }

    pub fn column(&self) -> &str {
        &self.binding.column
    }

    pub fn category(&self, category: &str) -> Option<&CategoryComparison> {
        self.categories.iter().find(|entry| entry.category == category)
    }

    /// Entry that the raw cell `value` was counted under.
    pub fn category_for(&self, value: &str) -> Option<&CategoryComparison> {
        self.categories.iter().find(|entry| entry.covers(value))
    }

    pub fn max_deviation_pct(&self) -> f64 {
        self.categories
            .iter()
            .map(CategoryComparison::deviation_pct)
            .fold(0.0, f64::max)
    }

    /// True when any category deviates from its reference by more than `threshold_pct` points.
    pub fn is_imbalanced(&self, threshold_pct: f64) -> bool {
        self.categories
            .iter()
            .any(|entry| entry.deviation_pct() > threshold_pct)
    }

    pub fn floor_categories(&self) -> impl Iterator<Item = &CategoryComparison> {
        self.categories
            .iter()
            .filter(|entry| entry.origin == ReferenceOrigin::Floor)
    }
}

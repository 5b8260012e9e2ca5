//! Reference provider trait and the in-memory catalog.

use std::collections::BTreeMap;

use reweigh_model::ReferenceDistribution;

/// Source of reference distributions, keyed by attribute name.
///
/// Implementations are read-only after construction and shared across
/// concurrent evaluations.
pub trait ReferenceProvider: Send + Sync {
    /// Display label of the source (e.g. "US Census").
    fn label(&self) -> &str;

    /// Reference table for an attribute, or `None` when the source has no data for it.
    ///
    /// A returned table is never empty.
    fn reference(&self, attribute: &str) -> Option<&ReferenceDistribution>;

    /// Attributes this source can answer for, in name order.
    fn attributes(&self) -> Vec<&str>;
}

/// Immutable collection of reference tables loaded from one source.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    label: String,
    tables: BTreeMap<String, ReferenceDistribution>,
}

impl ReferenceCatalog {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Add or replace the table for its attribute.
    pub fn insert(&mut self, distribution: ReferenceDistribution) {
        self.tables
            .insert(attribute_key(&distribution.attribute), distribution);
    }

    #[must_use]
    pub fn with_distribution(mut self, distribution: ReferenceDistribution) -> Self {
        self.insert(distribution);
        self
    }

    /// Overlay another catalog; its tables win on conflicts.
    pub fn merge(&mut self, other: ReferenceCatalog) {
        for (key, table) in other.tables {
            self.tables.insert(key, table);
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceDistribution> {
        self.tables.values()
    }
}

impl ReferenceProvider for ReferenceCatalog {
    fn label(&self) -> &str {
        &self.label
    }

    fn reference(&self, attribute: &str) -> Option<&ReferenceDistribution> {
        self.tables.get(&attribute_key(attribute))
    }

    fn attributes(&self) -> Vec<&str> {
        self.tables
            .values()
            .map(|table| table.attribute.as_str())
            .collect()
    }
}

fn attribute_key(attribute: &str) -> String {
    attribute.trim().to_ascii_lowercase()
}

//! Reference and observed category distributions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Tolerance applied when checking that reference proportions sum to at most 1.
const TOTAL_TOLERANCE: f64 = 1e-9;

/// Expected population proportions for one attribute.
///
/// Every stored proportion is finite and in `(0, 1]`, and the table is never
/// empty. Categories that are missing from the table are resolved by the
/// comparator with a floor proportion, never with zero.
///
/// Aliases map alternative spellings (e.g. `F`) onto a table category, so
/// that every spelling of one category shares a single reference share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDistribution {
    /// Attribute this distribution describes (e.g. "geography").
    pub attribute: String,
    /// Human-readable label (e.g. "Zip/Area Code").
    pub label: String,
    proportions: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    aliases: BTreeMap<String, String>,
}

impl ReferenceDistribution {
    /// Build a distribution from proportions that are already normalized.
    pub fn from_proportions(
        attribute: impl Into<String>,
        label: impl Into<String>,
        proportions: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let attribute = attribute.into();
        if proportions.is_empty() {
            return Err(ModelError::EmptyDistribution { attribute });
        }
        let mut total = 0.0;
        for (category, &value) in &proportions {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ModelError::InvalidProportion {
                    attribute,
                    category: category.clone(),
                    value,
                });
            }
            total += value;
        }
        if total > 1.0 + TOTAL_TOLERANCE {
            return Err(ModelError::ProportionOverflow { attribute, total });
        }
        Ok(Self {
            attribute,
            label: label.into(),
            proportions,
            aliases: BTreeMap::new(),
        })
    }

    /// Build a distribution from raw population counts, normalized by their total.
    pub fn from_counts(
        attribute: impl Into<String>,
        label: impl Into<String>,
        counts: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let attribute = attribute.into();
        for (category, &value) in &counts {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidCount {
                    attribute,
                    category: category.clone(),
                    value,
                });
            }
        }
        let total: f64 = counts.values().sum();
        let proportions = counts
            .into_iter()
            .map(|(category, count)| (category, count / total))
            .collect();
        Self::from_proportions(attribute, label, proportions)
    }

    /// Attach `(alias, category)` pairs.
    ///
    /// Every target must be a table category, and an alias may not collide
    /// with a category or with another alias, ignoring case.
    pub fn with_aliases<I, A, C>(mut self, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        for (alias, category) in aliases {
            let alias = alias.into().trim().to_string();
            let category = category.into();
            if !self.proportions.contains_key(&category) {
                return Err(ModelError::UnknownAliasTarget {
                    attribute: self.attribute,
                    alias,
                    category,
                });
            }
            let clashes_category = self
                .proportions
                .keys()
                .any(|key| key != &category && key.trim().eq_ignore_ascii_case(&alias));
            let clashes_alias = self
                .aliases
                .iter()
                .any(|(key, target)| target != &category && key.eq_ignore_ascii_case(&alias));
            if clashes_category || clashes_alias {
                return Err(ModelError::AliasConflict {
                    attribute: self.attribute,
                    alias,
                });
            }
            if alias.is_empty() || alias == category {
                continue;
            }
            self.aliases.insert(alias, category);
        }
        Ok(self)
    }

    /// Table category that `value` stands for.
    ///
    /// Tries the table and the aliases exactly, then both again ignoring case
    /// and surrounding whitespace.
    pub fn resolve(&self, value: &str) -> Option<&str> {
        if let Some((category, _)) = self.proportions.get_key_value(value) {
            return Some(category);
        }
        if let Some(category) = self.aliases.get(value) {
            return Some(category);
        }
        let wanted = value.trim();
        if let Some(category) = self
            .proportions
            .keys()
            .find(|key| key.trim().eq_ignore_ascii_case(wanted))
        {
            return Some(category);
        }
        self.aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(wanted))
            .map(|(_, category)| category.as_str())
    }

    /// Reference proportion for `value`, resolved through [`Self::resolve`].
    pub fn proportion(&self, value: &str) -> Option<f64> {
        self.resolve(value)
            .and_then(|category| self.proportions.get(category))
            .copied()
    }

    /// `(alias, category)` pairs, ordered by alias.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, category)| (alias.as_str(), category.as_str()))
    }

    pub fn len(&self) -> usize {
        self.proportions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proportions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.proportions
            .iter()
            .map(|(category, value)| (category.as_str(), *value))
    }

    pub fn total(&self) -> f64 {
        self.proportions.values().sum()
    }
}

/// Category proportions observed in one dataset column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedDistribution {
    /// Row count per category over non-missing cells.
    pub counts: BTreeMap<String, usize>,
    /// Number of rows holding a value.
    pub non_missing: usize,
    /// Number of rows with a null or blank value.
    pub missing: usize,
}

impl ObservedDistribution {
    /// Tally category values; `None` entries count as missing.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut observed = Self::default();
        for value in values {
            match value {
                Some(category) => {
                    *observed.counts.entry(category.into()).or_insert(0) += 1;
                    observed.non_missing += 1;
                }
                None => observed.missing += 1,
            }
        }
        observed
    }

    /// Proportion of non-missing rows holding `category` (0 when unseen).
    pub fn proportion(&self, category: &str) -> f64 {
        if self.non_missing == 0 {
            return 0.0;
        }
        self.counts
            .get(category)
            .map_or(0.0, |count| *count as f64 / self.non_missing as f64)
    }

    /// Full-precision proportions for every observed category.
    pub fn proportions(&self) -> BTreeMap<String, f64> {
        self.counts
            .keys()
            .map(|category| (category.clone(), self.proportion(category)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.non_missing == 0
    }
}

/// Correction multiplier per category for one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightMap {
    multipliers: BTreeMap<String, f64>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, multiplier: f64) {
        self.multipliers.insert(category.into(), multiplier);
    }

    /// Multiplier for a category; categories without an entry contribute 1.0.
    pub fn multiplier(&self, category: &str) -> f64 {
        self.multipliers.get(category).copied().unwrap_or(1.0)
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.multipliers.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.multipliers
            .iter()
            .map(|(category, value)| (category.as_str(), *value))
    }
}

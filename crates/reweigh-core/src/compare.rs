//! Observed-versus-reference comparison for bound attributes.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use reweigh_ingest::column_categories;
use reweigh_model::{
    AttributeBinding, AttributeComparison, CategoryComparison, ObservedDistribution,
    ReferenceDistribution, ReferenceOrigin,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Tally the category values of `column`, including columns with no values.
pub fn tally_column(df: &DataFrame, column: &str) -> Result<ObservedDistribution> {
    let values = column_categories(df, column)?;
    Ok(ObservedDistribution::from_values(values))
}

/// Tally the non-missing category values of `column`.
///
/// Fails when every cell is null or blank.
pub fn observed_distribution(df: &DataFrame, column: &str) -> Result<ObservedDistribution> {
    let observed = tally_column(df, column)?;
    if observed.is_empty() {
        return Err(EngineError::EmptyColumn {
            column: column.to_string(),
        });
    }
    Ok(observed)
}

/// Compare the bound column of `df` against `reference`.
pub fn compare(
    df: &DataFrame,
    binding: &AttributeBinding,
    reference: &ReferenceDistribution,
    config: &EngineConfig,
) -> Result<AttributeComparison> {
    let observed = observed_distribution(df, &binding.column)?;
    Ok(compare_observed(binding, &observed, reference, config))
}

#[derive(Default)]
struct CategoryGroup {
    count: usize,
    variants: BTreeSet<String>,
    reference: Option<f64>,
}

/// Pair each observed category with its reference proportion.
///
/// Raw values are first resolved to the reference category they stand for,
/// so `F`, `female` and `Female` are counted as one category and share one
/// reference proportion. Categories come out by descending count, then
/// category text. A value the reference cannot resolve keeps its raw text,
/// receives `config.floor_proportion` and is marked [`ReferenceOrigin::Floor`].
pub fn compare_observed(
    binding: &AttributeBinding,
    observed: &ObservedDistribution,
    reference: &ReferenceDistribution,
    config: &EngineConfig,
) -> AttributeComparison {
    let mut groups: BTreeMap<String, CategoryGroup> = BTreeMap::new();
    for (value, count) in &observed.counts {
        let (key, share) = match reference.resolve(value) {
            Some(category) => (category.to_string(), reference.proportion(category)),
            None => (value.clone(), None),
        };
        let group = groups.entry(key.clone()).or_default();
        group.count += count;
        group.reference = share;
        if *value != key {
            group.variants.insert(value.clone());
        }
    }

    let merged = groups
        .values()
        .map(|group| group.variants.len())
        .sum::<usize>();
    if merged > 0 {
        debug!(
            attribute = %binding.attribute,
            column = %binding.column,
            spellings = merged,
            "raw spellings resolved to reference categories"
        );
    }

    let mut categories: Vec<CategoryComparison> = groups
        .into_iter()
        .map(|(category, group)| {
            let (reference_share, origin) = match group.reference {
                Some(value) => (value, ReferenceOrigin::Table),
                None => (config.floor_proportion, ReferenceOrigin::Floor),
            };
            CategoryComparison {
                category,
                variants: group.variants.into_iter().collect(),
                count: group.count,
                observed: group.count as f64 / observed.non_missing as f64,
                reference: reference_share,
                origin,
            }
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    let floored = categories
        .iter()
        .filter(|entry| entry.origin == ReferenceOrigin::Floor)
        .count();
    if floored > 0 {
        warn!(
            attribute = %binding.attribute,
            column = %binding.column,
            categories = floored,
            floor = config.floor_proportion,
            "categories missing from reference table received the floor proportion"
        );
    }

    AttributeComparison {
        binding: binding.clone(),
        reference_label: reference.label.clone(),
        non_missing: observed.non_missing,
        missing: observed.missing,
        categories,
    }
}

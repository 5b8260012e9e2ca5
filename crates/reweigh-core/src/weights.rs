//! Correction weights.
//!
//! Each corrected attribute contributes a per-category multiplier
//! `reference / observed`; a row's weight is the product of the multipliers of
//! its category values. Missing cells contribute 1.0.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::warn;

use reweigh_ingest::column_categories;
use reweigh_model::{AttributeComparison, WeightAnomaly, WeightMap};

use crate::error::{EngineError, Result};

/// Per-category multipliers for one comparison.
///
/// Every raw spelling counted under a category gets that category's
/// multiplier. A ratio that is non-finite or not strictly positive is
/// replaced by 1.0 and reported as an anomaly.
pub fn weight_map(comparison: &AttributeComparison) -> (WeightMap, Vec<WeightAnomaly>) {
    let mut map = WeightMap::new();
    let mut anomalies = Vec::new();
    for entry in &comparison.categories {
        let ratio = entry.ratio();
        let multiplier = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            warn!(
                attribute = %comparison.attribute(),
                ratio,
                "unusable correction ratio replaced with 1.0"
            );
            anomalies.push(WeightAnomaly {
                attribute: comparison.attribute().to_string(),
                category: entry.category.clone(),
                reason: format!(
                    "ratio {ratio} (reference {} / observed {}) is not a positive finite number",
                    entry.reference, entry.observed
                ),
            });
            1.0
        };
        map.insert(&entry.category, multiplier);
        for variant in &entry.variants {
            map.insert(variant, multiplier);
        }
    }
    (map, anomalies)
}

/// Row weights for `df` given `(column, weight map)` pairs.
///
/// With no pairs every weight is 1.0. Fails when a row's product is not a
/// positive finite number.
pub fn compute_weights(df: &DataFrame, corrections: &[(&str, &WeightMap)]) -> Result<Vec<f64>> {
    let mut weights = vec![1.0; df.height()];
    for (column, map) in corrections {
        let values = column_categories(df, column)?;
        for (weight, value) in weights.iter_mut().zip(&values) {
            if let Some(category) = value {
                *weight *= map.multiplier(category);
            }
        }
    }
    if let Some((row, value)) = weights
        .iter()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || **weight <= 0.0)
    {
        return Err(EngineError::NonFiniteWeight { row, value: *value });
    }
    Ok(weights)
}

/// Weighted share of each category of `column` over its non-missing rows.
///
/// After a single-attribute correction the shares match the reference
/// proportions of the table categories.
pub fn weighted_shares(
    df: &DataFrame,
    column: &str,
    weights: &[f64],
) -> Result<BTreeMap<String, f64>> {
    shares_by(df, column, weights, |value| value.to_string())
}

/// Weighted shares for every corrected comparison, keyed by attribute name.
///
/// Raw spellings are folded into the category they were compared under, so
/// the shares line up with the comparison's categories.
pub fn weighted_shares_for(
    df: &DataFrame,
    comparisons: &[&AttributeComparison],
    weights: &[f64],
) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
    comparisons
        .iter()
        .map(|comparison| {
            let shares = shares_by(df, comparison.column(), weights, |value| {
                comparison
                    .category_for(value)
                    .map_or_else(|| value.to_string(), |entry| entry.category.clone())
            })?;
            Ok((comparison.attribute().to_string(), shares))
        })
        .collect()
}

fn shares_by<F>(
    df: &DataFrame,
    column: &str,
    weights: &[f64],
    key: F,
) -> Result<BTreeMap<String, f64>>
where
    F: Fn(&str) -> String,
{
    let values = column_categories(df, column)?;
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut overall = 0.0;
    for (value, weight) in values.iter().zip(weights) {
        if let Some(category) = value {
            *totals.entry(key(category)).or_insert(0.0) += weight;
            overall += weight;
        }
    }
    if overall > 0.0 {
        for share in totals.values_mut() {
            *share /= overall;
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use reweigh_model::{AttributeBinding, CategoryComparison, ReferenceOrigin};

    use super::*;

    fn comparison(entries: &[(&str, f64, f64)]) -> AttributeComparison {
        AttributeComparison {
            binding: AttributeBinding::by_name("gender", "gender", "gender"),
            reference_label: "Gender".to_string(),
            non_missing: 4,
            missing: 0,
            categories: entries
                .iter()
                .map(|(category, observed, reference)| CategoryComparison {
                    category: (*category).to_string(),
                    variants: Vec::new(),
                    count: 1,
                    observed: *observed,
                    reference: *reference,
                    origin: ReferenceOrigin::Table,
                })
                .collect(),
        }
    }

    #[test]
    fn ratio_is_reference_over_observed() {
        let (map, anomalies) = weight_map(&comparison(&[("F", 0.75, 0.5), ("M", 0.25, 0.5)]));
        assert!(anomalies.is_empty());
        assert!((map.multiplier("F") - 2.0 / 3.0).abs() < 1e-12);
        assert!((map.multiplier("M") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unusable_ratio_becomes_one() {
        let (map, anomalies) = weight_map(&comparison(&[("F", 0.0, 0.5), ("M", 1.0, 0.0)]));
        assert_eq!(map.multiplier("F"), 1.0);
        assert_eq!(map.multiplier("M"), 1.0);
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].category, "F");
    }

    #[test]
    fn missing_cells_contribute_one() {
        let df = df! { "gender" => &[Some("F"), None, Some("M")] }.unwrap();
        let mut map = WeightMap::new();
        map.insert("F", 0.5);
        map.insert("M", 3.0);
        let weights = compute_weights(&df, &[("gender", &map)]).unwrap();
        assert_eq!(weights, vec![0.5, 1.0, 3.0]);
    }

    #[test]
    fn infinite_product_is_rejected() {
        let df = df! { "a" => &["x"], "b" => &["y"] }.unwrap();
        let mut huge = WeightMap::new();
        huge.insert("x", f64::MAX);
        let mut also_huge = WeightMap::new();
        also_huge.insert("y", f64::MAX);
        let err = compute_weights(&df, &[("a", &huge), ("b", &also_huge)]).unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteWeight { row: 0, .. }));
    }

    #[test]
    fn shares_use_weights() {
        let df = df! { "gender" => &["F", "F", "F", "M"] }.unwrap();
        let third = 1.0 / 1.5;
        let shares = weighted_shares(&df, "gender", &[third, third, third, 2.0]).unwrap();
        assert!((shares["F"] - 0.5).abs() < 1e-12);
        assert!((shares["M"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn variants_share_the_category_multiplier_and_share() {
        let mut spelled = comparison(&[("Female", 0.8, 0.5), ("Male", 0.2, 0.5)]);
        spelled.categories[0].variants = vec!["F".to_string(), "female".to_string()];
        let (map, _) = weight_map(&spelled);
        assert_eq!(map.multiplier("F"), map.multiplier("Female"));
        assert_eq!(map.multiplier("female"), map.multiplier("Female"));

        let df = df! { "gender" => &["Female", "female", "F", "F", "Male"] }.unwrap();
        let weights = compute_weights(&df, &[("gender", &map)]).unwrap();
        let shares = weighted_shares_for(&df, &[&spelled], &weights).unwrap();
        let gender = &shares["gender"];
        assert_eq!(gender.len(), 2);
        assert!((gender["Female"] - 0.5).abs() < 1e-12);
        assert!((gender["Male"] - 0.5).abs() < 1e-12);
    }
}

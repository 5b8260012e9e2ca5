//! Attribute detection: bind registry attributes to dataset columns.
//!
//! Column names are tried first (case-insensitive keyword scan in column
//! order). When no name matches and the attribute declares a value shape,
//! each column's non-missing values are tested against the shape and the first
//! column whose match ratio exceeds the configured threshold wins.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;

use reweigh_ingest::{column_categories, column_names};
use reweigh_model::AttributeBinding;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::registry::{AttributeRegistry, AttributeSpec, ValueShape};

/// Detect the column holding `spec`'s attribute, if any.
pub fn detect(
    df: &DataFrame,
    spec: &AttributeSpec,
    config: &EngineConfig,
) -> Result<Option<AttributeBinding>> {
    detect_excluding(df, spec, config, &BTreeSet::new())
}

/// Run the detector for every registry entry in order.
///
/// A column already bound to an earlier attribute is skipped for later ones.
/// The returned vector is aligned with the registry.
pub fn detect_all(
    df: &DataFrame,
    registry: &AttributeRegistry,
    config: &EngineConfig,
) -> Result<Vec<Option<AttributeBinding>>> {
    let mut claimed = BTreeSet::new();
    let mut bindings = Vec::with_capacity(registry.len());
    for spec in registry.iter() {
        let binding = detect_excluding(df, spec, config, &claimed)?;
        if let Some(binding) = &binding {
            claimed.insert(binding.column.clone());
        }
        bindings.push(binding);
    }
    Ok(bindings)
}

fn detect_excluding(
    df: &DataFrame,
    spec: &AttributeSpec,
    config: &EngineConfig,
    claimed: &BTreeSet<String>,
) -> Result<Option<AttributeBinding>> {
    let columns: Vec<String> = column_names(df)
        .into_iter()
        .filter(|column| !claimed.contains(column))
        .collect();

    for column in &columns {
        if let Some(keyword) = spec.matching_keyword(column) {
            debug!(
                attribute = %spec.name,
                column = %column,
                keyword,
                "bound attribute by column name"
            );
            return Ok(Some(AttributeBinding::by_name(&spec.name, column, keyword)));
        }
    }

    let Some(shape) = spec.value_shape else {
        return Ok(None);
    };

    for column in &columns {
        let values = column_categories(df, column)?;
        let Some(ratio) = shape_match_ratio(shape, &values, config.shape_sample_rows) else {
            continue;
        };
        if ratio > config.shape_match_threshold {
            debug!(
                attribute = %spec.name,
                column = %column,
                match_ratio = ratio,
                shape = %shape.describe(),
                "bound attribute by value shape"
            );
            return Ok(Some(AttributeBinding::by_shape(&spec.name, column, ratio)));
        }
    }

    Ok(None)
}

/// Fraction of non-missing values matching `shape`; `None` for an all-missing column.
pub fn shape_match_ratio(
    shape: ValueShape,
    values: &[Option<String>],
    sample_rows: Option<usize>,
) -> Option<f64> {
    let limit = sample_rows.unwrap_or(usize::MAX);
    let mut total = 0usize;
    let mut matched = 0usize;
    for value in values.iter().flatten().take(limit) {
        total += 1;
        if shape.matches(value) {
            matched += 1;
        }
    }
    if total == 0 {
        None
    } else {
        Some(matched as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;
    use reweigh_model::BindingMethod;

    use super::*;

    fn geography() -> AttributeSpec {
        AttributeSpec::geography()
    }

    #[test]
    fn first_matching_column_name_wins() {
        let df = df! {
            "id" => &["1", "2"],
            "home_zip" => &["10001", "90001"],
            "area_code" => &["212", "310"],
        }
        .unwrap();
        let binding = detect(&df, &geography(), &EngineConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(binding.column, "home_zip");
        assert_eq!(
            binding.method,
            BindingMethod::ColumnName {
                keyword: "zip".to_string()
            }
        );
    }

    #[test]
    fn exact_match_does_not_bind_partial_names() {
        let df = df! { "gender_identity" => &["F", "M"] }.unwrap();
        assert!(
            detect(&df, &AttributeSpec::gender(), &EngineConfig::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn value_shape_fallback_requires_strict_majority() {
        let half = df! { "code" => &["10001", "abc", "90001", "xyz"] }.unwrap();
        assert!(
            detect(&half, &geography(), &EngineConfig::default())
                .unwrap()
                .is_none()
        );

        let majority = df! {
            "name" => &["Ann", "Bo", "Cy"],
            "postal" => &[Some("10001"), None, Some("90001")],
        }
        .unwrap();
        let binding = detect(&majority, &geography(), &EngineConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(binding.column, "postal");
        assert!(matches!(
            binding.method,
            BindingMethod::ValueShape { match_ratio } if (match_ratio - 1.0).abs() < 1e-12
        ));
    }

    #[test]
    fn sample_rows_limit_the_shape_scan() {
        let df = df! { "code" => &["10001", "abc", "def", "ghi"] }.unwrap();
        let config = EngineConfig::default().with_shape_sample_rows(Some(1));
        assert!(detect(&df, &geography(), &config).unwrap().is_some());
    }

    #[test]
    fn detect_all_skips_claimed_columns() {
        let df = df! { "sex" => &["F", "M"] }.unwrap();
        let registry = AttributeRegistry::new(vec![
            AttributeSpec::gender(),
            AttributeSpec::new("sex_at_birth", "Sex at birth")
                .with_keywords(["sex"], crate::registry::NameMatch::Exact),
        ]);
        let bindings = detect_all(&df, &registry, &EngineConfig::default()).unwrap();
        assert_eq!(bindings[0].as_ref().unwrap().column, "sex");
        assert!(bindings[1].is_none());
    }

    #[test]
    fn all_missing_column_has_no_ratio() {
        let values = vec![None, None];
        assert_eq!(shape_match_ratio(ValueShape::Digits(5), &values, None), None);
    }
}

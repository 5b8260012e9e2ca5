use std::collections::BTreeMap;

use polars::prelude::*;
use reweigh_core::{
    AttributeRegistry, AttributeSpec, EngineConfig, EngineError, NameMatch, evaluate,
    weighted_shares, weighted_shares_for,
};
use reweigh_model::{AttributeOutcome, ReferenceDistribution, ReferenceOrigin};
use reweigh_reference::{ReferenceCatalog, ReferenceProvider, builtin_source};

const TOLERANCE: f64 = 1e-9;

fn table(attribute: &str, label: &str, entries: &[(&str, f64)]) -> ReferenceDistribution {
    let proportions: BTreeMap<String, f64> = entries
        .iter()
        .map(|(category, value)| ((*category).to_string(), *value))
        .collect();
    ReferenceDistribution::from_proportions(attribute, label, proportions).unwrap()
}

fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::new("Synthetic")
        .with_distribution(table("gender", "Gender", &[("A", 0.5), ("B", 0.5)]))
        .with_distribution(table(
            "geography",
            "Zip/Area Code",
            &[("10001", 0.6), ("90001", 0.4)],
        ))
}

fn eighty_twenty() -> DataFrame {
    df! { "sex" => &["A", "A", "A", "A", "B"] }.unwrap()
}

#[test]
fn single_attribute_weights_match_reference() {
    let df = eighty_twenty();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap();

    assert!(result.rebalanced());
    for weight in &result.weights[..4] {
        assert!((weight - 0.625).abs() < TOLERANCE);
    }
    assert!((result.weights[4] - 2.5).abs() < TOLERANCE);

    let shares = weighted_shares(&df, "sex", &result.weights).unwrap();
    assert!((shares["A"] - 0.5).abs() < 1e-6);
    assert!((shares["B"] - 0.5).abs() < 1e-6);

    let gender = result.attribute("gender").unwrap();
    assert!(gender.is_imbalanced());
    assert!(matches!(
        result.attribute("geography").unwrap().outcome,
        AttributeOutcome::NotDetected
    ));
}

#[test]
fn intersectional_weight_is_product() {
    // geography: 10001 is 0.5 observed vs 0.6 reference, so 1.2.
    let df = df! {
        "zip" => &[
            "10001", "10001", "10001", "10001", "10001",
            "90001", "90001", "90001", "90001", "90001",
        ],
        "gender" => &["A", "A", "A", "A", "A", "A", "A", "A", "B", "B"],
    }
    .unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(result.corrected().count(), 2);
    assert!((result.weights[0] - 0.75).abs() < TOLERANCE);
    // 90001: 0.4 / 0.5 = 0.8; B: 0.5 / 0.2 = 2.5
    assert!((result.weights[9] - 2.0).abs() < TOLERANCE);
}

#[test]
fn no_binding_gives_identity_weights() {
    let df = df! {
        "name" => &["Ann", "Bo", "Cy"],
        "score" => &["1", "22", "333"],
    }
    .unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(result.weights, vec![1.0, 1.0, 1.0]);
    assert!(!result.rebalanced());
    assert!(result.anomalies.is_empty());
}

#[test]
fn missing_values_contribute_one() {
    let df = df! {
        "zip" => &[Some("10001"), Some("90001"), None, Some("90001")],
        "gender" => &[Some("A"), None, Some("B"), Some("B")],
    }
    .unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap();

    let geography = result
        .attribute("geography")
        .unwrap()
        .outcome
        .weights()
        .unwrap();
    let gender = result.attribute("gender").unwrap().outcome.weights().unwrap();

    // Row 1 has no gender; row 2 has no zip.
    assert!((result.weights[1] - geography.multiplier("90001")).abs() < TOLERANCE);
    assert!((result.weights[2] - gender.multiplier("B")).abs() < TOLERANCE);
    assert!(result.weights.iter().all(|w| w.is_finite() && *w > 0.0));
}

#[test]
fn evaluation_is_deterministic() {
    let df = df! {
        "zip" => &["10001", "90001", "60601", "10001"],
        "Gender" => &["A", "B", "B", "B"],
    }
    .unwrap();
    let census = builtin_source("US Census").unwrap();
    let registry = AttributeRegistry::default();
    let config = EngineConfig::default();
    let first = evaluate(&df, &registry, &census, &config).unwrap();
    let second = evaluate(&df, &registry, &census, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_category_gets_floor_reference() {
    let df = df! { "zip" => &["10001", "10001", "99999", "90001"] }.unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap();

    let comparison = result
        .attribute("geography")
        .unwrap()
        .outcome
        .comparison()
        .unwrap();
    let unknown = comparison.category("99999").unwrap();
    assert_eq!(unknown.origin, ReferenceOrigin::Floor);
    assert_eq!(unknown.reference, 0.0001);
    // floor / observed, bounded by floor * non_missing
    assert!((result.weights[2] - 0.0004).abs() < TOLERANCE);
    assert!(result.weights[2] <= 0.0001 * 4.0 + TOLERANCE);
}

#[test]
fn configured_floor_is_used() {
    let df = df! { "zip" => &["99999", "10001"] }.unwrap();
    let config = EngineConfig::default().with_floor_proportion(0.01);
    let result = evaluate(&df, &AttributeRegistry::default(), &catalog(), &config).unwrap();
    assert!((result.weights[0] - 0.02).abs() < TOLERANCE);
}

#[test]
fn missing_reference_table_is_an_outcome() {
    let df = df! { "age_band" => &["18-34", "35+"], "sex" => &["A", "B"] }.unwrap();
    let registry = AttributeRegistry::default().with(
        AttributeSpec::new("age_band", "Age Band").with_keywords(["age"], NameMatch::Contains),
    );
    let result = evaluate(&df, &registry, &catalog(), &EngineConfig::default()).unwrap();

    let names: Vec<&str> = result
        .attributes
        .iter()
        .map(|entry| entry.attribute.as_str())
        .collect();
    assert_eq!(names, vec!["geography", "gender", "age_band"]);
    assert_eq!(
        result.attribute("age_band").unwrap().outcome,
        AttributeOutcome::NoReference {
            column: "age_band".to_string()
        }
    );
    assert_eq!(result.weights, vec![1.0, 1.0]);
    assert!(result.rebalanced());
}

#[test]
fn empty_dataset_is_rejected() {
    let df = DataFrame::new(vec![Column::new("zip".into(), Vec::<&str>::new())]).unwrap();
    let err = evaluate(
        &df,
        &AttributeRegistry::default(),
        &catalog(),
        &EngineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::EmptyDataset));
}

#[test]
fn invalid_config_is_rejected() {
    let config = EngineConfig::default().with_floor_proportion(-1.0);
    let err = evaluate(
        &eighty_twenty(),
        &AttributeRegistry::default(),
        &catalog(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig { .. }));
}

#[test]
fn bound_column_without_values_leaves_other_attributes_corrected() {
    let df = df! {
        "zip" => &["10001", "90001", "90001"],
        "Gender" => &[None::<&str>, None, None],
    }
    .unwrap();
    let census = builtin_source("US Census").unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &census,
        &EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(
        result.attribute("gender").unwrap().outcome,
        AttributeOutcome::NoValues {
            column: "Gender".to_string()
        }
    );
    assert_eq!(result.corrected().count(), 1);
    assert!(result.rebalanced());

    let zips = census.reference("geography").unwrap();
    let expected_10001 = zips.proportion("10001").unwrap() / (1.0 / 3.0);
    let expected_90001 = zips.proportion("90001").unwrap() / (2.0 / 3.0);
    assert!((result.weights[0] - expected_10001).abs() < TOLERANCE);
    assert!((result.weights[1] - expected_90001).abs() < TOLERANCE);
    assert!((result.weights[2] - expected_90001).abs() < TOLERANCE);
}

#[test]
fn case_variants_share_one_reference_category() {
    let df = df! { "gender" => &["Female", "Female", "female", "female", "Male"] }.unwrap();
    let census = builtin_source("US Census").unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &census,
        &EngineConfig::default(),
    )
    .unwrap();

    for weight in &result.weights[..4] {
        assert!((weight - 0.625).abs() < TOLERANCE);
    }
    assert!((result.weights[4] - 2.5).abs() < TOLERANCE);

    let comparisons: Vec<_> = result.corrected().collect();
    let shares = weighted_shares_for(&df, &comparisons, &result.weights).unwrap();
    let gender = &shares["gender"];
    assert_eq!(gender.len(), 2);
    assert!((gender["Female"] - 0.5).abs() < 1e-9);
    assert!((gender["Male"] - 0.5).abs() < 1e-9);
}

#[test]
fn coded_gender_values_resolve_through_aliases() {
    let df = df! { "Gender" => &["F", "F", "F", "F", "M"] }.unwrap();
    let census = builtin_source("US Census").unwrap();
    let result = evaluate(
        &df,
        &AttributeRegistry::default(),
        &census,
        &EngineConfig::default(),
    )
    .unwrap();

    for weight in &result.weights[..4] {
        assert!((weight - 0.625).abs() < TOLERANCE);
    }
    assert!((result.weights[4] - 2.5).abs() < TOLERANCE);

    let comparison = result.corrected().next().unwrap();
    assert_eq!(comparison.floor_categories().count(), 0);
    assert_eq!(comparison.category("Female").unwrap().variants, vec!["F"]);
    assert_eq!(comparison.category("Male").unwrap().variants, vec!["M"]);
}

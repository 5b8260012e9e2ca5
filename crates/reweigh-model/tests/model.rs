//! Tests for reweigh-model types.

use reweigh_model::{
    AttributeBinding, AttributeComparison, AttributeOutcome, AttributeResult, CategoryComparison,
    EvaluationResult, ReferenceOrigin, WeightMap, WeightSummary,
};

fn gender_comparison() -> AttributeComparison {
    AttributeComparison {
        binding: AttributeBinding::by_name("gender", "Gender", "gender"),
        reference_label: "Gender".to_string(),
        non_missing: 10,
        missing: 0,
        categories: vec![
            CategoryComparison {
                category: "Female".to_string(),
                variants: vec!["F".to_string(), "female".to_string()],
                count: 8,
                observed: 0.8,
                reference: 0.5,
                origin: ReferenceOrigin::Table,
            },
            CategoryComparison {
                category: "Other".to_string(),
                variants: Vec::new(),
                count: 2,
                observed: 0.2,
                reference: 0.0001,
                origin: ReferenceOrigin::Floor,
            },
        ],
    }
}

#[test]
fn comparison_deviation_and_floor_categories() {
    let comparison = gender_comparison();
    assert!((comparison.max_deviation_pct() - 30.0).abs() < 1e-9);
    assert!(comparison.is_imbalanced(5.0));
    assert!(!comparison.is_imbalanced(31.0));
    let floors: Vec<&str> = comparison
        .floor_categories()
        .map(|entry| entry.category.as_str())
        .collect();
    assert_eq!(floors, vec!["Other"]);
    assert!((comparison.categories[0].ratio() - 0.625).abs() < 1e-12);
}

#[test]
fn raw_spellings_find_their_category() {
    let comparison = gender_comparison();
    assert_eq!(comparison.category_for("F").unwrap().category, "Female");
    assert_eq!(comparison.category_for("female").unwrap().category, "Female");
    assert_eq!(comparison.category_for("Other").unwrap().category, "Other");
    assert!(comparison.category_for("FEMALE").is_none());
}

#[test]
fn empty_column_outcome_keeps_its_column() {
    let outcome = AttributeOutcome::NoValues {
        column: "Gender".to_string(),
    };
    assert_eq!(outcome.status(), "no_values");
    assert_eq!(outcome.column(), Some("Gender"));
    assert!(outcome.comparison().is_none());
    assert_eq!(AttributeOutcome::NotDetected.column(), None);
}

#[test]
fn summary_reports_effective_sample_size() {
    let summary = WeightSummary::from_weights(&[0.5, 0.5, 2.0]).unwrap();
    assert_eq!(summary.min, 0.5);
    assert_eq!(summary.max, 2.0);
    assert!((summary.sum - 3.0).abs() < 1e-12);
    assert!((summary.mean - 1.0).abs() < 1e-12);
    assert!((summary.effective_sample_size - 9.0 / 4.5).abs() < 1e-12);
    assert!(WeightSummary::from_weights(&[]).is_none());
}

#[test]
fn result_without_corrections_is_not_rebalanced() {
    let result = EvaluationResult {
        source: "US Census".to_string(),
        row_count: 2,
        attributes: vec![AttributeResult {
            attribute: "geography".to_string(),
            label: "Zip/Area Code".to_string(),
            imbalance_threshold_pct: 1.0,
            outcome: AttributeOutcome::NotDetected,
        }],
        weights: vec![1.0, 1.0],
        anomalies: Vec::new(),
    };
    assert!(!result.rebalanced());
    assert_eq!(result.corrected().count(), 0);
    assert_eq!(result.attributes[0].outcome.status(), "not_detected");
}

#[test]
fn result_serializes() {
    let mut weights = WeightMap::new();
    weights.insert("Female", 0.625);
    let result = EvaluationResult {
        source: "US Census".to_string(),
        row_count: 10,
        attributes: vec![AttributeResult {
            attribute: "gender".to_string(),
            label: "Gender".to_string(),
            imbalance_threshold_pct: 5.0,
            outcome: AttributeOutcome::Corrected {
                comparison: gender_comparison(),
                weights,
            },
        }],
        weights: vec![0.625; 10],
        anomalies: Vec::new(),
    };
    let json = serde_json::to_string(&result).expect("serialize result");
    assert!(json.contains("\"status\":\"corrected\""));
    let round: EvaluationResult = serde_json::from_str(&json).expect("deserialize result");
    assert_eq!(round, result);
    assert!(round.rebalanced());
    assert!(round.attribute("gender").unwrap().is_imbalanced());
}

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use reweigh_reference::{ReferenceError, ReferenceProvider, builtin_source, load_reference_csv};
use tempfile::tempdir;

#[test]
fn external_file_overlays_builtin_source() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("age.csv");
    fs::write(
        &path,
        "attribute,label,category,value\nage_band,Age Band,18-34,30\nage_band,Age Band,35+,70\n",
    )
    .unwrap();

    let mut catalog = builtin_source("US Census").unwrap();
    catalog.merge(load_reference_csv(&path, "Local survey").unwrap());

    assert_eq!(catalog.attributes(), vec!["age_band", "gender", "geography"]);
    let ages = catalog.reference("age_band").unwrap();
    assert_eq!(ages.label, "Age Band");
    assert!((ages.proportion("35+").unwrap() - 0.7).abs() < 1e-12);
}

#[test]
fn builtin_gender_accepts_coded_values() {
    let catalog = builtin_source("US Census").unwrap();
    let gender = catalog.reference("gender").unwrap();
    assert_eq!(gender.resolve("F"), Some("Female"));
    assert_eq!(gender.resolve("m"), Some("Male"));
    assert_eq!(gender.resolve("Woman"), Some("Female"));
    assert_eq!(gender.proportion("M"), Some(0.5));
    assert!((gender.total() - 1.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_reported() {
    let err = load_reference_csv(Path::new("/no/such/reference.csv"), "Nowhere").unwrap_err();
    assert!(matches!(err, ReferenceError::FileNotFound { .. }));
}

#[test]
fn catalog_is_shareable_across_threads() {
    let catalog = Arc::new(builtin_source("census").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || catalog.reference("geography").map(|table| table.len()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(3));
    }
}

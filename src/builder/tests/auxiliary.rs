//! Auxiliary attribute merging and missing-column warnings

use super::{community_table, push_cohort, push_empty, test_registry};
use crate::builder::DatasetBuilder;
use crate::config::BuildConfig;
use crate::diagnostics::Diagnostic;
use crate::models::FieldValue;

#[test]
fn test_present_column_values_are_copied() {
    let mut table = community_table(&["LeafBiomass"]);
    table
        .push_row([
            FieldValue::Int(1),
            FieldValue::from("pinus"),
            FieldValue::Int(10),
            FieldValue::Int(500),
            FieldValue::Float(42.5),
        ])
        .unwrap();

    let config = BuildConfig::default().with_auxiliary("LeafBiomass", 0.0);
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let dataset = builder.build_with_sink(&table, &mut diagnostics).unwrap();

    let cohort = &dataset.get(1).unwrap().cohorts()[0];
    assert_eq!(cohort.attribute("LeafBiomass"), Some(&FieldValue::Float(42.5)));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_column_uses_default_and_warns_once() {
    let mut table = community_table(&[]);
    for age in [10, 20, 30, 40] {
        push_cohort(&mut table, 1, "pinus", age, 100);
    }
    push_cohort(&mut table, 2, "acersacc", 50, 100);

    let config = BuildConfig::default()
        .with_auxiliary("LeafBiomass", 0.0)
        .with_auxiliary("Origin", "seeded");
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let dataset = builder.build_with_sink(&table, &mut diagnostics).unwrap();

    for group in &dataset {
        for cohort in group.cohorts() {
            assert_eq!(cohort.attribute("LeafBiomass"), Some(&FieldValue::Float(0.0)));
            assert_eq!(
                cohort.attribute("Origin"),
                Some(&FieldValue::Text("seeded".to_string()))
            );
        }
    }

    let missing: Vec<&str> = diagnostics
        .iter()
        .filter_map(|d| match d {
            Diagnostic::MissingAuxiliaryColumn { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(missing, vec!["LeafBiomass", "Origin"]);
}

#[test]
fn test_warning_state_resets_between_builds() {
    let mut table = community_table(&[]);
    push_cohort(&mut table, 1, "pinus", 10, 100);
    push_cohort(&mut table, 1, "pinus", 20, 100);

    let config = BuildConfig::default().with_auxiliary("LeafBiomass", 0i64);
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();

    for _ in 0..2 {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        builder.build_with_sink(&table, &mut diagnostics).unwrap();
        assert_eq!(diagnostics.len(), 1);
    }
}

#[test]
fn test_attribute_keys_match_request_exactly() {
    let mut table = community_table(&["LeafBiomass", "Unrequested"]);
    table
        .push_row([
            FieldValue::Int(1),
            FieldValue::from("pinus"),
            FieldValue::Int(10),
            FieldValue::Int(500),
            FieldValue::Int(7),
            FieldValue::from("ignored"),
        ])
        .unwrap();

    let config = BuildConfig::default()
        .with_auxiliary("LeafBiomass", 0i64)
        .with_auxiliary("Origin", FieldValue::Null);
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();
    let dataset = builder.build_with_sink(&table, &mut Vec::<Diagnostic>::new()).unwrap();

    let cohort = &dataset.get(1).unwrap().cohorts()[0];
    let keys: Vec<&str> = cohort.attributes().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["LeafBiomass", "Origin"]);
    assert_eq!(cohort.attribute("LeafBiomass"), Some(&FieldValue::Int(7)));
    assert_eq!(cohort.attribute("Origin"), Some(&FieldValue::Null));
}

#[test]
fn test_null_cell_in_present_column_is_kept() {
    let mut table = community_table(&["LeafBiomass"]);
    push_cohort(&mut table, 1, "pinus", 10, 500);

    let config = BuildConfig::default().with_auxiliary("LeafBiomass", 3i64);
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let dataset = builder.build_with_sink(&table, &mut diagnostics).unwrap();

    let cohort = &dataset.get(1).unwrap().cohorts()[0];
    assert_eq!(cohort.attribute("LeafBiomass"), Some(&FieldValue::Null));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_na_rows_do_not_warn() {
    let mut table = community_table(&[]);
    push_empty(&mut table, 1);
    push_empty(&mut table, 2);

    let config = BuildConfig::default().with_auxiliary("LeafBiomass", 0i64);
    let builder = DatasetBuilder::new(test_registry(), config).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    builder.build_with_sink(&table, &mut diagnostics).unwrap();

    assert!(diagnostics.is_empty());
}

//! Grouping of cohorts by map code

use super::{community_table, push_cohort, push_empty, test_registry};
use crate::builder::DatasetBuilder;
use crate::config::BuildConfig;
use crate::error::CommunityError;
use crate::models::FieldValue;

#[test]
fn test_two_cohorts_same_map_code() {
    let mut table = community_table(&[]);
    push_cohort(&mut table, 1, "pinus", 10, 500);
    push_cohort(&mut table, 1, "pinus", 20, 300);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    let dataset = builder.build(&table).unwrap();

    assert_eq!(dataset.len(), 1);
    let group = dataset.get(1).unwrap();
    let ages: Vec<u16> = group.cohorts().iter().map(|c| c.age()).collect();
    let biomass: Vec<u32> = group.cohorts().iter().map(|c| c.biomass()).collect();
    assert_eq!(ages, vec![10, 20]);
    assert_eq!(biomass, vec![500, 300]);
    assert!(group.cohorts().iter().all(|c| c.species_name() == "pinus"));
}

#[test]
fn test_na_row_creates_empty_group() {
    let mut table = community_table(&[]);
    push_empty(&mut table, 2);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    let dataset = builder.build(&table).unwrap();

    assert_eq!(dataset.len(), 1);
    assert!(dataset.get(2).unwrap().is_empty());
    assert_eq!(dataset.empty_group_count(), 1);
}

#[test]
fn test_na_sentinel_is_trimmed() {
    let mut table = community_table(&[]);
    table
        .push_row([FieldValue::Int(4), FieldValue::from("  NA ")])
        .unwrap();

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    let dataset = builder.build(&table).unwrap();
    assert!(dataset.get(4).unwrap().is_empty());
}

#[test]
fn test_na_sentinel_is_case_sensitive() {
    let mut table = community_table(&[]);
    table
        .push_row([FieldValue::Int(4), FieldValue::from("na")])
        .unwrap();

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    // "na" is treated as a species row, which has no age
    assert!(matches!(
        builder.build(&table),
        Err(CommunityError::InvalidField { .. })
    ));
}

#[test]
fn test_na_table_needs_no_cohort_columns() {
    let mut table = crate::table::RecordTable::new(["MapCode", "SpeciesName"]);
    table
        .push_row([FieldValue::Int(9), FieldValue::from("NA")])
        .unwrap();

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    let dataset = builder.build(&table).unwrap();
    assert!(dataset.get(9).unwrap().is_empty());
}

#[test]
fn test_mixed_groups_keep_their_cohorts() {
    let mut table = community_table(&[]);
    push_cohort(&mut table, 1, "pinus", 10, 500);
    push_empty(&mut table, 2);
    push_cohort(&mut table, 3, "acersacc", 150, 1200);
    push_cohort(&mut table, 1, "acersacc", 40, 700);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    let dataset = builder.build(&table).unwrap();

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.cohort_count(), 3);
    assert_eq!(dataset.get(1).unwrap().len(), 2);
    assert_eq!(dataset.get(3).unwrap().cohorts()[0].age(), 150);

    let mut codes: Vec<u32> = dataset.map_codes().collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![1, 2, 3]);
}

#[test]
fn test_empty_table_gives_empty_dataset() {
    let table = community_table(&[]);
    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    assert!(builder.build(&table).unwrap().is_empty());
}

#[test]
fn test_na_after_cohorts_is_duplicate() {
    let mut table = community_table(&[]);
    push_cohort(&mut table, 5, "pinus", 10, 500);
    push_empty(&mut table, 5);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    match builder.build(&table) {
        Err(CommunityError::DuplicateMapCode { row, map_code }) => {
            assert_eq!(row, 2);
            assert_eq!(map_code, 5);
        }
        other => panic!("Expected DuplicateMapCode, got {:?}", other),
    }
}

#[test]
fn test_na_twice_is_duplicate() {
    let mut table = community_table(&[]);
    push_empty(&mut table, 5);
    push_empty(&mut table, 5);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    assert!(matches!(
        builder.build(&table),
        Err(CommunityError::DuplicateMapCode { map_code: 5, .. })
    ));
}

#[test]
fn test_cohort_after_na_is_duplicate() {
    let mut table = community_table(&[]);
    push_empty(&mut table, 6);
    push_cohort(&mut table, 6, "pinus", 10, 500);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    match builder.build(&table) {
        Err(err @ CommunityError::DuplicateMapCode { .. }) => {
            assert_eq!(err.offending_value().as_deref(), Some("6"));
        }
        other => panic!("Expected DuplicateMapCode, got {:?}", other),
    }
}

#[test]
fn test_negative_map_code_rejected() {
    let mut table = community_table(&[]);
    push_cohort(&mut table, -1, "pinus", 10, 500);

    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    assert!(matches!(
        builder.build(&table),
        Err(CommunityError::InvalidField { ref column, .. }) if column == "MapCode"
    ));
}

#[test]
fn test_missing_map_code_column() {
    let table = crate::table::RecordTable::new(["SpeciesName", "CohortAge", "CohortBiomass"]);
    let builder = DatasetBuilder::new(test_registry(), BuildConfig::default()).unwrap();
    assert!(matches!(
        builder.build(&table),
        Err(CommunityError::MissingColumn { ref column }) if column == "MapCode"
    ));
}

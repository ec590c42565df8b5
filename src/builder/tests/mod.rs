//! Tests for the dataset builder
//!
//! Exercises grouping, row validation and auxiliary attribute handling on
//! in-memory community tables.

pub mod auxiliary;
pub mod grouping;

use crate::models::FieldValue;
use crate::species::SpeciesRegistry;
use crate::table::RecordTable;

/// Registry with `pinus` (longevity 100) and `acersacc` (longevity 300)
pub fn test_registry() -> SpeciesRegistry {
    SpeciesRegistry::new()
        .with_species("pinus", 100)
        .unwrap()
        .with_species("acersacc", 300)
        .unwrap()
}

/// Empty table with the four core columns plus any extra columns
pub fn community_table(extra_columns: &[&str]) -> RecordTable {
    let mut columns = vec!["MapCode", "SpeciesName", "CohortAge", "CohortBiomass"];
    columns.extend_from_slice(extra_columns);
    RecordTable::new(columns)
}

/// Append a cohort row (map code, species, age, biomass)
pub fn push_cohort(table: &mut RecordTable, map_code: i64, species: &str, age: i64, biomass: i64) {
    table
        .push_row([
            FieldValue::Int(map_code),
            FieldValue::from(species),
            FieldValue::Int(age),
            FieldValue::Int(biomass),
        ])
        .unwrap();
}

/// Append an `NA` row for a map code
pub fn push_empty(table: &mut RecordTable, map_code: i64) {
    table
        .push_row([FieldValue::Int(map_code), FieldValue::from("NA")])
        .unwrap();
}

//! Dataset builder for community tables.
//!
//! Validates each row of a community table against the species registry,
//! groups cohorts by map code and attaches the requested auxiliary
//! attributes. The first invalid row aborts the whole build.

#[cfg(test)]
pub mod tests;

use crate::config::{BuildConfig, LongevityPolicy};
use crate::constants::{
    COHORT_AGE_COLUMN, COHORT_BIOMASS_COLUMN, EMPTY_COMMUNITY_SENTINEL, MAP_CODE_COLUMN,
    SPECIES_NAME_COLUMN,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{CommunityError, Result};
use crate::models::{Cohort, CohortAttributes, Dataset, Species};
use crate::species::SpeciesLookup;
use crate::table::{RowRef, TableSource};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Builds [`Dataset`]s from community tables
#[derive(Debug, Clone)]
pub struct DatasetBuilder<L> {
    species: L,
    config: BuildConfig,
}

/// Accumulation state local to one build
#[derive(Debug, Default)]
struct BuildState {
    dataset: Dataset,
    empty_codes: HashSet<u32>,
    warned: HashSet<String>,
    rows_read: usize,
}

impl<L: SpeciesLookup> DatasetBuilder<L> {
    /// Create a builder; the configuration is validated here
    pub fn new(species: L, config: BuildConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { species, config })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build a dataset, logging diagnostics through `tracing`
    pub fn build<T: TableSource>(&self, table: &T) -> Result<Dataset> {
        self.build_with_sink(table, &mut TracingSink)
    }

    /// Build a dataset, sending diagnostics to `sink`
    pub fn build_with_sink<T, S>(&self, table: &T, sink: &mut S) -> Result<Dataset>
    where
        T: TableSource,
        S: DiagnosticSink + ?Sized,
    {
        for column in [MAP_CODE_COLUMN, SPECIES_NAME_COLUMN] {
            if !table.has_column(column) {
                return Err(CommunityError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        let mut state = BuildState::default();
        for row in table.rows() {
            self.process_row(&row, &mut state, sink)?;
            state.rows_read += 1;
        }

        let dataset = state.dataset;
        debug!(
            "Built {} map units ({} empty) with {} cohorts from {} rows",
            dataset.len(),
            dataset.empty_group_count(),
            dataset.cohort_count(),
            state.rows_read
        );
        Ok(dataset)
    }

    fn process_row<T, S>(&self, row: &RowRef<'_, T>, state: &mut BuildState, sink: &mut S) -> Result<()>
    where
        T: TableSource,
        S: DiagnosticSink + ?Sized,
    {
        let map_code = read_map_code(row)?;
        let species_name = row.text(SPECIES_NAME_COLUMN)?;
        let species_name = species_name.trim();

        if species_name == EMPTY_COMMUNITY_SENTINEL {
            if state.dataset.contains(map_code) {
                return Err(CommunityError::DuplicateMapCode {
                    row: row.number(),
                    map_code,
                });
            }
            state.empty_codes.insert(map_code);
            state.dataset.group_entry(map_code);
            return Ok(());
        }

        if state.empty_codes.contains(&map_code) {
            return Err(CommunityError::DuplicateMapCode {
                row: row.number(),
                map_code,
            });
        }

        let cohort = self.read_cohort(row, species_name, state, sink)?;
        state.dataset.group_entry(map_code).push(cohort);
        Ok(())
    }

    fn read_cohort<T, S>(
        &self,
        row: &RowRef<'_, T>,
        species_name: &str,
        state: &mut BuildState,
        sink: &mut S,
    ) -> Result<Cohort>
    where
        T: TableSource,
        S: DiagnosticSink + ?Sized,
    {
        let age = row.int(COHORT_AGE_COLUMN)?;
        let biomass = row.int(COHORT_BIOMASS_COLUMN)?;

        let species = self
            .species
            .get(species_name)
            .ok_or_else(|| CommunityError::UnknownSpecies {
                row: row.number(),
                name: species_name.to_string(),
            })?;

        if age <= 0 {
            return Err(CommunityError::InvalidAge {
                row: row.number(),
                age,
            });
        }

        let age = match u16::try_from(age) {
            Ok(valid) if valid <= species.longevity => valid,
            _ => self.resolve_excess_age(row.number(), &species, age, sink)?,
        };

        if biomass <= 0 {
            return Err(CommunityError::InvalidBiomass {
                row: row.number(),
                biomass,
            });
        }
        let biomass = u32::try_from(biomass).map_err(|_| {
            row.invalid(
                COHORT_BIOMASS_COLUMN,
                &biomass.to_string(),
                "outside the 32-bit integer range",
            )
        })?;

        let attributes = self.read_auxiliary(row, state, sink)?;
        Ok(Cohort::new(species, age, biomass, attributes))
    }

    fn resolve_excess_age<S>(
        &self,
        row: usize,
        species: &Arc<Species>,
        age: i64,
        sink: &mut S,
    ) -> Result<u16>
    where
        S: DiagnosticSink + ?Sized,
    {
        match self.config.longevity_policy {
            LongevityPolicy::Strict => Err(CommunityError::AgeExceedsLongevity {
                row,
                species: species.name.clone(),
                age,
                longevity: species.longevity,
            }),
            LongevityPolicy::Clamp => {
                let clamped = clamp_age(species.longevity, self.config.timestep);
                sink.report(Diagnostic::AgeClamped {
                    row,
                    species: species.name.clone(),
                    age,
                    longevity: species.longevity,
                    clamped_to: clamped,
                });
                Ok(clamped)
            }
        }
    }

    fn read_auxiliary<T, S>(
        &self,
        row: &RowRef<'_, T>,
        state: &mut BuildState,
        sink: &mut S,
    ) -> Result<CohortAttributes>
    where
        T: TableSource,
        S: DiagnosticSink + ?Sized,
    {
        let mut attributes = CohortAttributes::new();
        for (name, default) in &self.config.auxiliary {
            let value = if row.has_column(name) {
                row.value(name)?
            } else {
                if !state.warned.contains(name) {
                    state.warned.insert(name.clone());
                    sink.report(Diagnostic::MissingAuxiliaryColumn {
                        name: name.clone(),
                        default: default.clone(),
                    });
                }
                default.clone()
            };
            attributes.insert(name.clone(), value);
        }
        Ok(attributes)
    }
}

fn read_map_code<T: TableSource>(row: &RowRef<'_, T>) -> Result<u32> {
    let map_code = row.i32(MAP_CODE_COLUMN)?;
    u32::try_from(map_code).map_err(|_| {
        row.invalid(
            MAP_CODE_COLUMN,
            &map_code.to_string(),
            "map codes must be >= 0",
        )
    })
}

/// Age used for an over-age cohort under [`LongevityPolicy::Clamp`]: `longevity - timestep`, at least 1
pub fn clamp_age(longevity: u16, timestep: i32) -> u16 {
    let clamped = (i64::from(longevity) - i64::from(timestep.max(0))).max(1);
    u16::try_from(clamped).unwrap_or(longevity)
}

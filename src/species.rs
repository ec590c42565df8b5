//! Species registry for name lookups during validation.
//!
//! The dataset builder only depends on [`SpeciesLookup`]; [`SpeciesRegistry`]
//! is the bundled implementation, filled by hand or from a species table.

use crate::constants::{LONGEVITY_COLUMN, SPECIES_CODE_COLUMN, SPECIES_NAME_COLUMN};
use crate::error::{CommunityError, Result};
use crate::models::Species;
use crate::table::{TableSource, read_csv_table};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Name to species resolution
pub trait SpeciesLookup {
    /// Resolve a species by exact name
    fn get(&self, name: &str) -> Option<Arc<Species>>;
}

/// Species indexed by name for O(1) lookups
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: HashMap<String, Arc<Species>>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a species; names must be unique
    pub fn insert(&mut self, species: Species) -> Result<()> {
        if self.species.contains_key(&species.name) {
            return Err(CommunityError::configuration(format!(
                "Species {} is listed more than once",
                species.name
            )));
        }
        self.species.insert(species.name.clone(), Arc::new(species));
        Ok(())
    }

    /// Builder-style variant of [`SpeciesRegistry::insert`]
    pub fn with_species(mut self, name: impl Into<String>, longevity: u16) -> Result<Self> {
        self.insert(Species::new(name, longevity))?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.species.contains_key(name)
    }

    /// Species names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.species.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a registry from a species table.
    ///
    /// The name comes from `SpeciesCode`, or `SpeciesName` when that column is
    /// absent; `Longevity` must be a positive integer no larger than 65535.
    pub fn from_table<T: TableSource>(table: &T) -> Result<Self> {
        let name_column = if table.has_column(SPECIES_CODE_COLUMN) {
            SPECIES_CODE_COLUMN
        } else if table.has_column(SPECIES_NAME_COLUMN) {
            SPECIES_NAME_COLUMN
        } else {
            return Err(CommunityError::MissingColumn {
                column: SPECIES_CODE_COLUMN.to_string(),
            });
        };

        let mut registry = Self::new();
        for row in table.rows() {
            let name = row.text(name_column)?.trim().to_string();
            let longevity = row.int(LONGEVITY_COLUMN)?;
            let longevity = u16::try_from(longevity)
                .ok()
                .filter(|&l| l > 0)
                .ok_or_else(|| {
                    row.invalid(
                        LONGEVITY_COLUMN,
                        &longevity.to_string(),
                        "longevity must be between 1 and 65535",
                    )
                })?;
            registry.insert(Species::new(name, longevity))?;
        }

        debug!("Registered {} species", registry.len());
        Ok(registry)
    }

    /// Load a registry from a species `.csv` file
    pub fn load_csv(path: &Path) -> Result<Self> {
        let df = read_csv_table(path)?;
        let registry = Self::from_table(&df)?;
        info!(
            "Loaded {} species from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }
}

impl SpeciesLookup for SpeciesRegistry {
    fn get(&self, name: &str) -> Option<Arc<Species>> {
        self.species.get(name).cloned()
    }
}

impl<L: SpeciesLookup + ?Sized> SpeciesLookup for Arc<L> {
    fn get(&self, name: &str) -> Option<Arc<Species>> {
        (**self).get(name)
    }
}

impl<L: SpeciesLookup + ?Sized> SpeciesLookup for &L {
    fn get(&self, name: &str) -> Option<Arc<Species>> {
        (**self).get(name)
    }
}

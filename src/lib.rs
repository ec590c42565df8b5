//! Initial Communities Library
//!
//! Reads the initial composition of a forest landscape (which species' age
//! cohorts stand on each map unit, and with how much biomass) into an
//! in-memory dataset for a succession simulation.
//!
//! This library provides tools for:
//! - Reading community tables from CSV with a strict `.csv` extension policy
//! - Validating each cohort against a species registry (age, longevity, biomass)
//! - Grouping cohorts by map code, including empty `NA` map units
//! - Copying requested auxiliary columns onto cohorts, with defaults for absent columns
//! - Parsing `(N)` biomass literals and the legacy text community format
//! - Rebinning cohort ages to the succession timestep

pub mod biomass;
pub mod builder;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod legacy;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod rebin;
pub mod species;
pub mod table;

// Re-export commonly used types
pub use biomass::{BiomassValue, parse_biomass, read_biomass};
pub use builder::DatasetBuilder;
pub use config::{AuxiliaryParameters, BuildConfig, LongevityPolicy};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{BiomassLiteralCause, CommunityError, Result};
pub use models::{Cohort, Dataset, FieldValue, MapUnitGroup, Species};
pub use rebin::{AgeBiomass, bin_ages};
pub use species::{SpeciesLookup, SpeciesRegistry};
pub use table::{RecordTable, TableSource, read_csv_table};

//! End-to-end loading of initial communities from files.
//!
//! Chains the input-file parser, the table readers and the dataset builder.

use crate::builder::DatasetBuilder;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::input::parse_input_file;
use crate::legacy::read_legacy_file;
use crate::models::Dataset;
use crate::species::SpeciesLookup;
use crate::table::read_csv_table;
use std::path::Path;
use tracing::info;

impl<L: SpeciesLookup> DatasetBuilder<L> {
    /// Build from a community `.csv` table; other extensions fail before any row is read
    pub fn build_from_csv<S>(&self, path: &Path, sink: &mut S) -> Result<Dataset>
    where
        S: DiagnosticSink + ?Sized,
    {
        let table = read_csv_table(path)?;
        let dataset = self.build_with_sink(&table, sink)?;
        info!(
            "Read {} map units with {} cohorts from {}",
            dataset.len(),
            dataset.cohort_count(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build from an initial-communities input file naming a `.csv` table
    pub fn build_from_input_file<S>(&self, path: &Path, sink: &mut S) -> Result<Dataset>
    where
        S: DiagnosticSink + ?Sized,
    {
        let input = parse_input_file(path)?;
        self.build_from_csv(&input.csv_file, sink)
    }

    /// Build from a legacy text file of `MapCode` blocks
    pub fn build_from_legacy_file<S>(&self, path: &Path, sink: &mut S) -> Result<Dataset>
    where
        S: DiagnosticSink + ?Sized,
    {
        let table = read_legacy_file(path)?;
        let dataset = self.build_with_sink(&table, sink)?;
        info!(
            "Read {} map units with {} cohorts from legacy text {}",
            dataset.len(),
            dataset.cohort_count(),
            path.display()
        );
        Ok(dataset)
    }
}

//! Non-fatal diagnostics raised while building a dataset.
//!
//! Diagnostics never abort a build. They go to a [`DiagnosticSink`] chosen by
//! the caller: [`TracingSink`] logs them, a `Vec<Diagnostic>` collects them.

use crate::models::FieldValue;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A requested auxiliary column is absent; the default is used for every row
    MissingAuxiliaryColumn { name: String, default: FieldValue },
    /// A cohort older than its species' longevity was clamped
    AgeClamped {
        row: usize,
        species: String,
        age: i64,
        longevity: u16,
        clamped_to: u16,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingAuxiliaryColumn { name, default } => write!(
                f,
                "Community table has no \"{}\" column; using the default value {}",
                name, default
            ),
            Diagnostic::AgeClamped {
                row,
                species,
                age,
                longevity,
                clamped_to,
            } => write!(
                f,
                "Row {}: age {} of {} exceeds longevity {}; using age {}",
                row, age, species, longevity, clamped_to
            ),
        }
    }
}

/// Receiver for build diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that logs each diagnostic as a `tracing` warning
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

//! Configuration for dataset builds.
//!
//! Holds the succession timestep, the policy for cohorts older than their
//! species' longevity, and the auxiliary attributes requested from the
//! community table together with their defaults.

use crate::constants::CORE_COLUMNS;
use crate::error::{CommunityError, Result};
use crate::models::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Requested auxiliary attribute names mapped to the value used when a column is absent
pub type AuxiliaryParameters = BTreeMap<String, FieldValue>;

/// What to do with a cohort whose age exceeds its species' longevity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LongevityPolicy {
    /// Fail the build with `AgeExceedsLongevity`
    #[default]
    Strict,
    /// Replace the age with `longevity - timestep` (at least 1) and warn
    Clamp,
}

/// Settings for one dataset build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Succession timestep in years; zero or less disables rebinning
    pub timestep: i32,

    /// Handling of cohorts older than their species' longevity
    pub longevity_policy: LongevityPolicy,

    /// Auxiliary attributes to copy onto each cohort
    pub auxiliary: AuxiliaryParameters,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            timestep: 0,
            longevity_policy: LongevityPolicy::Strict,
            auxiliary: AuxiliaryParameters::new(),
        }
    }
}

impl BuildConfig {
    /// Create configuration with a succession timestep
    pub fn with_timestep(mut self, timestep: i32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the longevity policy
    pub fn with_longevity_policy(mut self, policy: LongevityPolicy) -> Self {
        self.longevity_policy = policy;
        self
    }

    /// Request an auxiliary attribute with its fallback value
    pub fn with_auxiliary(mut self, name: impl Into<String>, default: impl Into<FieldValue>) -> Self {
        self.auxiliary.insert(name.into(), default.into());
        self
    }

    /// Replace the whole auxiliary request set
    pub fn with_auxiliary_parameters(mut self, auxiliary: AuxiliaryParameters) -> Self {
        self.auxiliary = auxiliary;
        self
    }

    /// Check the configuration before any row is read
    pub fn validate(&self) -> Result<()> {
        for name in self.auxiliary.keys() {
            if name.trim().is_empty() {
                return Err(CommunityError::configuration(
                    "Auxiliary attribute names must not be empty",
                ));
            }
            if name.trim() != name {
                return Err(CommunityError::configuration(format!(
                    "Auxiliary attribute \"{}\" has surrounding whitespace",
                    name
                )));
            }
            if CORE_COLUMNS.contains(&name.as_str()) {
                return Err(CommunityError::configuration(format!(
                    "Auxiliary attribute \"{}\" clashes with a required column",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            CommunityError::configuration(format!(
                "Invalid build configuration in {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        debug!(
            "Loaded build configuration from {}: timestep {}, policy {:?}, {} auxiliary attributes",
            path.display(),
            config.timestep,
            config.longevity_policy,
            config.auxiliary.len()
        );
        Ok(config)
    }
}

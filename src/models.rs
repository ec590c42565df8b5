//! Core data structures for initial community datasets.
//!
//! Defines cell values, species descriptors, cohorts, map-unit groups and
//! the dataset that collects them.

use crate::rebin::AgeBiomass;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A typed cell value from a community table or an auxiliary default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Interpret a bare command-line literal, trying bool, integer and float before text
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return FieldValue::Null;
        }
        if let Ok(flag) = trimmed.parse::<bool>() {
            return FieldValue::Bool(flag);
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return FieldValue::Int(int);
        }
        if let Ok(float) = trimmed.parse::<f64>() {
            return FieldValue::Float(float);
        }
        FieldValue::Text(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Coerce to an integer: integers, integral floats and numeric text qualify
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                if *value >= i64::MIN as f64 && *value <= i64::MAX as f64 {
                    Some(*value as i64)
                } else {
                    None
                }
            }
            FieldValue::Text(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write!(f, "{}", value),
            FieldValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Species descriptor as resolved from a species registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    /// Maximum valid cohort age in years
    pub longevity: u16,
}

impl Species {
    pub fn new(name: impl Into<String>, longevity: u16) -> Self {
        Self {
            name: name.into(),
            longevity,
        }
    }
}

/// Auxiliary attributes attached to one cohort, keyed by requested name
pub type CohortAttributes = BTreeMap<String, FieldValue>;

/// One validated age cohort of a species
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    species: Arc<Species>,
    age: u16,
    biomass: u32,
    attributes: CohortAttributes,
}

impl Cohort {
    pub fn new(species: Arc<Species>, age: u16, biomass: u32, attributes: CohortAttributes) -> Self {
        Self {
            species,
            age,
            biomass,
            attributes,
        }
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn species_name(&self) -> &str {
        &self.species.name
    }

    pub fn age(&self) -> u16 {
        self.age
    }

    pub fn biomass(&self) -> u32 {
        self.biomass
    }

    pub fn attributes(&self) -> &CohortAttributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&FieldValue> {
        self.attributes.get(name)
    }
}

/// All cohorts initially present on one map unit
#[derive(Debug, Clone, PartialEq)]
pub struct MapUnitGroup {
    map_code: u32,
    cohorts: Vec<Cohort>,
}

impl MapUnitGroup {
    pub fn new(map_code: u32, cohorts: Vec<Cohort>) -> Self {
        Self { map_code, cohorts }
    }

    /// Create a map unit with no cohorts
    pub fn empty(map_code: u32) -> Self {
        Self::new(map_code, Vec::new())
    }

    pub fn map_code(&self) -> u32 {
        self.map_code
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn total_biomass(&self) -> u64 {
        self.cohorts.iter().map(|c| u64::from(c.biomass)).sum()
    }

    /// Biomass summed by cohort age across all species
    pub fn age_biomass(&self) -> AgeBiomass {
        let mut profile = AgeBiomass::new();
        for cohort in &self.cohorts {
            *profile.entry(u32::from(cohort.age)).or_insert(0) += u64::from(cohort.biomass);
        }
        profile
    }

    pub(crate) fn push(&mut self, cohort: Cohort) {
        self.cohorts.push(cohort);
    }
}

/// The initial communities of a landscape, one group per distinct map code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    groups: Vec<MapUnitGroup>,
    index: HashMap<u32, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group; a code that is already present is rejected and the group handed back
    pub fn add(&mut self, group: MapUnitGroup) -> std::result::Result<(), MapUnitGroup> {
        if self.index.contains_key(&group.map_code) {
            return Err(group);
        }
        self.index.insert(group.map_code, self.groups.len());
        self.groups.push(group);
        Ok(())
    }

    /// Look up the group for a map code
    pub fn get(&self, map_code: u32) -> Option<&MapUnitGroup> {
        self.index.get(&map_code).map(|&i| &self.groups[i])
    }

    /// Group for a map code, created empty on first use
    pub(crate) fn group_entry(&mut self, map_code: u32) -> &mut MapUnitGroup {
        let position = match self.index.get(&map_code) {
            Some(&position) => position,
            None => {
                self.index.insert(map_code, self.groups.len());
                self.groups.push(MapUnitGroup::empty(map_code));
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }

    pub fn contains(&self, map_code: u32) -> bool {
        self.index.contains_key(&map_code)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MapUnitGroup> {
        self.groups.iter()
    }

    pub fn map_codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.iter().map(MapUnitGroup::map_code)
    }

    pub fn cohort_count(&self) -> usize {
        self.groups.iter().map(MapUnitGroup::len).sum()
    }

    /// Number of map units declared with no cohorts
    pub fn empty_group_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_empty()).count()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MapUnitGroup;
    type IntoIter = std::slice::Iter<'a, MapUnitGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = MapUnitGroup;
    type IntoIter = std::vec::IntoIter<MapUnitGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

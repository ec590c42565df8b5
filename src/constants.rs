//! Application constants for initial community processing
//!
//! Column names, sentinels, value bounds and input-file keywords used
//! throughout the crate.

// =============================================================================
// Community Table Columns
// =============================================================================

/// Map-unit code column (integer)
pub const MAP_CODE_COLUMN: &str = "MapCode";

/// Species name column (string, or the empty-community sentinel)
pub const SPECIES_NAME_COLUMN: &str = "SpeciesName";

/// Cohort age column (integer, years)
pub const COHORT_AGE_COLUMN: &str = "CohortAge";

/// Cohort biomass column (integer, g/m2)
pub const COHORT_BIOMASS_COLUMN: &str = "CohortBiomass";

/// Columns every community table must provide
pub const CORE_COLUMNS: &[&str] = &[
    MAP_CODE_COLUMN,
    SPECIES_NAME_COLUMN,
    COHORT_AGE_COLUMN,
    COHORT_BIOMASS_COLUMN,
];

/// Species name marking a map unit without initial cohorts (case-sensitive, compared after trimming)
pub const EMPTY_COMMUNITY_SENTINEL: &str = "NA";

/// Only community tables with this extension are read from disk
pub const COMMUNITY_TABLE_EXTENSION: &str = "csv";

// =============================================================================
// Species Table Columns
// =============================================================================

/// Preferred species identifier column in species tables
pub const SPECIES_CODE_COLUMN: &str = "SpeciesCode";

/// Species longevity column (years)
pub const LONGEVITY_COLUMN: &str = "Longevity";

// =============================================================================
// Biomass Literals
// =============================================================================

/// Unit label attached to parsed biomass literals
pub const BIOMASS_UNIT: &str = "Biomass gm-2";

/// Largest biomass accepted in a `(N)` literal
pub const MAX_BIOMASS_LITERAL: i64 = 500_000;

/// Smallest biomass accepted in a `(N)` literal
pub const MIN_BIOMASS_LITERAL: i64 = 0;

// =============================================================================
// Input Files
// =============================================================================

/// Name of the first variable in an input file
pub const LANDIS_DATA_VAR: &str = "LandisData";

/// Required value of `LandisData` for initial-community input files
pub const INITIAL_COMMUNITIES_LABEL: &str = "Initial Communities";

/// Variable naming the community table
pub const CSV_FILE_VAR: &str = "CSV_File";

/// Comment marker in text input files
pub const COMMENT_MARKER: &str = ">>";

/// Keyword opening a map-unit block in the legacy text format
pub const MAP_CODE_KEYWORD: &str = "MapCode";

//! Error handling for initial community processing.
//!
//! Every validation failure names the offending value and a readable cause.
//! All of them abort the build; no partial dataset is ever returned.

use std::path::PathBuf;
use thiserror::Error;

/// Why a `(N)` biomass literal was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiomassLiteralCause {
    /// Input ended before any token
    MissingValue,
    /// First non-whitespace character was not `(`
    MissingOpenParen,
    /// Nothing between `(` and the terminating delimiter
    EmptyToken,
    /// Token is not an integer
    NonNumeric(String),
    /// Integer outside `[0, 500000]`
    OutOfRange(String),
    /// Input ended while expecting `)`
    MissingCloseParen,
    /// Something other than `)` followed the integer
    UnexpectedCharacter(char),
}

impl std::fmt::Display for BiomassLiteralCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue => write!(f, "Missing value"),
            Self::MissingOpenParen => write!(f, "Value does not start with \"(\""),
            Self::EmptyToken => write!(f, "No biomass after \"(\""),
            Self::NonNumeric(token) => write!(f, "\"{}\" is not an integer", token),
            Self::OutOfRange(token) => write!(f, "{} is not between 0 and 500,000", token),
            Self::MissingCloseParen => write!(f, "Missing \")\""),
            Self::UnexpectedCharacter(ch) => {
                write!(f, "Value ends with \"{}\" instead of \")\"", ch)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum CommunityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Input file {} line {line}: {reason}", .path.display())]
    InputFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Community table has no \"{column}\" column")]
    MissingColumn { column: String },

    #[error("Row {row}: \"{value}\" is not a valid {column} ({reason})")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Row {row}: the species name cannot be NA if MapCode {map_code} is already in use")]
    DuplicateMapCode { row: usize, map_code: u32 },

    #[error("Row {row}: \"{name}\" is not a species name")]
    UnknownSpecies { row: usize, name: String },

    #[error("Row {row}: invalid age {age} (ages must be > 0)")]
    InvalidAge { row: usize, age: i64 },

    #[error("Row {row}: the age {age} is more than longevity ({longevity}) of {species}")]
    AgeExceedsLongevity {
        row: usize,
        species: String,
        age: i64,
        longevity: u16,
    },

    #[error("Row {row}: invalid biomass {biomass} (biomass must be > 0)")]
    InvalidBiomass { row: usize, biomass: i64 },

    #[error("\"{}\" is not a valid aboveground biomass input: {cause}", .literal.trim_start_matches('('))]
    MalformedBiomassLiteral {
        literal: String,
        cause: BiomassLiteralCause,
    },
}

impl CommunityError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a biomass literal error from the text consumed so far
    pub fn biomass_literal(literal: impl Into<String>, cause: BiomassLiteralCause) -> Self {
        Self::MalformedBiomassLiteral {
            literal: literal.into(),
            cause,
        }
    }

    /// The literal input value that triggered a validation error, if any
    pub fn offending_value(&self) -> Option<String> {
        match self {
            Self::InvalidField { value, .. } => Some(value.clone()),
            Self::DuplicateMapCode { map_code, .. } => Some(map_code.to_string()),
            Self::UnknownSpecies { name, .. } => Some(name.clone()),
            Self::InvalidAge { age, .. } | Self::AgeExceedsLongevity { age, .. } => {
                Some(age.to_string())
            }
            Self::InvalidBiomass { biomass, .. } => Some(biomass.to_string()),
            Self::MalformedBiomassLiteral { literal, .. } => Some(literal.clone()),
            Self::MissingColumn { column } => Some(column.clone()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CommunityError>;

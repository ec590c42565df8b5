//! Legacy text format for initial communities.
//!
//! Older inputs list cohorts as free text, one species per line, each age
//! followed by a biomass literal:
//!
//! ```text
//! MapCode 1
//! pinus     10 (500)  20 (300)
//! acersacc  40 (1200)
//!
//! MapCode 2
//! ```
//!
//! A `MapCode` block without species lines is an empty map unit. The text is
//! converted into a [`RecordTable`] with the usual community columns so the
//! dataset builder applies the same validation as for CSV tables.

use crate::biomass::read_biomass;
use crate::constants::{
    COHORT_AGE_COLUMN, COHORT_BIOMASS_COLUMN, COMMENT_MARKER, EMPTY_COMMUNITY_SENTINEL,
    MAP_CODE_COLUMN, MAP_CODE_KEYWORD, SPECIES_NAME_COLUMN,
};
use crate::error::{CommunityError, Result};
use crate::models::FieldValue;
use crate::reader::CharCursor;
use crate::table::{RecordTable, TableSource};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a legacy text file into a community table
pub fn read_legacy_file(path: &Path) -> Result<RecordTable> {
    let text = fs::read_to_string(path)?;
    parse_legacy_text(&text, path)
}

/// Convert legacy text into a community table; `path` is only used in messages
pub fn parse_legacy_text(text: &str, path: &Path) -> Result<RecordTable> {
    let mut table = RecordTable::new([
        MAP_CODE_COLUMN,
        SPECIES_NAME_COLUMN,
        COHORT_AGE_COLUMN,
        COHORT_BIOMASS_COLUMN,
    ]);
    // (map code, number of cohort rows written for it)
    let mut current: Option<(i64, usize)> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = match raw_line.find(COMMENT_MARKER) {
            Some(position) => &raw_line[..position],
            None => raw_line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let error = |reason: String| CommunityError::InputFile {
            path: path.to_path_buf(),
            line: line_number,
            reason,
        };

        let mut cursor = CharCursor::new(line);
        cursor.skip_whitespace();
        let first_word = cursor.read_bare_word();

        if first_word == MAP_CODE_KEYWORD {
            close_block(&mut table, current)?;
            cursor.skip_whitespace();
            let code_text = cursor.read_bare_word();
            let map_code = code_text
                .parse::<i64>()
                .map_err(|_| error(format!("\"{}\" is not a valid map code", code_text)))?;
            let extra = cursor.read_rest();
            if !extra.trim().is_empty() {
                return Err(error(format!(
                    "Extra text after the map code: \"{}\"",
                    extra.trim()
                )));
            }
            current = Some((map_code, 0));
            continue;
        }

        let Some((map_code, cohort_rows)) = current.as_mut() else {
            return Err(error(format!(
                "Expected \"{}\" before species \"{}\"",
                MAP_CODE_KEYWORD, first_word
            )));
        };

        let cohorts = read_species_cohorts(&mut cursor)
            .map_err(|e| match e {
                LineError::Text(reason) => error(reason),
                LineError::Community(inner) => inner,
            })?;
        if cohorts.is_empty() {
            return Err(error(format!("No age cohorts listed for {}", first_word)));
        }

        for (age, biomass) in cohorts {
            table.push_row([
                FieldValue::Int(*map_code),
                FieldValue::from(first_word.as_str()),
                FieldValue::Int(age),
                FieldValue::Int(i64::from(biomass)),
            ])?;
            *cohort_rows += 1;
        }
    }
    close_block(&mut table, current)?;

    debug!(
        "Converted legacy text {} into {} community rows",
        path.display(),
        table.row_count()
    );
    Ok(table)
}

enum LineError {
    Text(String),
    Community(CommunityError),
}

/// Read `age (biomass)` pairs up to the end of the line
fn read_species_cohorts(cursor: &mut CharCursor<'_>) -> std::result::Result<Vec<(i64, u32)>, LineError> {
    let mut cohorts = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.is_at_end() {
            return Ok(cohorts);
        }

        let age_text = cursor.read_word('(');
        let age = age_text
            .parse::<i64>()
            .map_err(|_| LineError::Text(format!("\"{}\" is not a valid age", age_text)))?;
        let biomass = read_biomass(cursor).map_err(LineError::Community)?;
        cohorts.push((age, biomass.value));
    }
}

/// Emit an `NA` row for a map-unit block that listed no cohorts
fn close_block(table: &mut RecordTable, block: Option<(i64, usize)>) -> Result<()> {
    if let Some((map_code, 0)) = block {
        table.push_row([
            FieldValue::Int(map_code),
            FieldValue::from(EMPTY_COMMUNITY_SENTINEL),
        ])?;
    }
    Ok(())
}

//! Initial-communities input file parsing.
//!
//! The input file names the community table:
//!
//! ```text
//! >> comments start with two angle brackets
//! LandisData  "Initial Communities"
//! CSV_File    "initial-communities.csv"
//! ```
//!
//! A relative `CSV_File` is resolved against the input file's directory.

use crate::constants::{COMMENT_MARKER, CSV_FILE_VAR, INITIAL_COMMUNITIES_LABEL, LANDIS_DATA_VAR};
use crate::error::{CommunityError, Result};
use crate::reader::CharCursor;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of an initial-communities input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path of the input file itself
    pub path: PathBuf,
    /// Community table, resolved against the input file's directory
    pub csv_file: PathBuf,
}

/// Read and parse an input file from disk
pub fn parse_input_file(path: &Path) -> Result<InputFile> {
    let text = fs::read_to_string(path)?;
    parse_input_text(&text, path)
}

/// Parse input file text; `path` is used for messages and to resolve `CSV_File`
pub fn parse_input_text(text: &str, path: &Path) -> Result<InputFile> {
    let mut variables = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_comment(line)))
        .filter(|(_, line)| !line.trim().is_empty());

    let error = |line: usize, reason: String| CommunityError::InputFile {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let (line, content) = variables
        .next()
        .ok_or_else(|| error(1, format!("Expected \"{}\"", LANDIS_DATA_VAR)))?;
    let label = read_variable(content, LANDIS_DATA_VAR).map_err(|reason| error(line, reason))?;
    if label != INITIAL_COMMUNITIES_LABEL {
        return Err(error(
            line,
            format!(
                "{} is \"{}\", expected \"{}\"",
                LANDIS_DATA_VAR, label, INITIAL_COMMUNITIES_LABEL
            ),
        ));
    }

    let (line, content) = variables
        .next()
        .ok_or_else(|| error(line + 1, format!("Expected \"{}\"", CSV_FILE_VAR)))?;
    let csv_value = read_variable(content, CSV_FILE_VAR).map_err(|reason| error(line, reason))?;

    if let Some((line, content)) = variables.next() {
        return Err(error(
            line,
            format!("Unexpected text after {}: \"{}\"", CSV_FILE_VAR, content.trim()),
        ));
    }

    let csv_file = resolve_relative(path, Path::new(&csv_value));
    debug!(
        "Input file {} names community table {}",
        path.display(),
        csv_file.display()
    );

    Ok(InputFile {
        path: path.to_path_buf(),
        csv_file,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(position) => &line[..position],
        None => line,
    }
}

/// Read `NAME value` from one line, checking the name
fn read_variable(line: &str, expected_name: &str) -> std::result::Result<String, String> {
    let mut cursor = CharCursor::new(line);
    cursor.skip_whitespace();

    let name = cursor.read_bare_word();
    if name != expected_name {
        return Err(format!("Expected \"{}\" but found \"{}\"", expected_name, name));
    }

    cursor.skip_whitespace();
    let value = read_value(&mut cursor)?;
    if value.is_empty() {
        return Err(format!("Missing value for {}", expected_name));
    }

    let extra = cursor.read_rest();
    if !extra.trim().is_empty() {
        return Err(format!(
            "Extra text after the value of {}: \"{}\"",
            expected_name,
            extra.trim()
        ));
    }
    Ok(value)
}

/// A double-quoted string or a bare word
fn read_value(cursor: &mut CharCursor<'_>) -> std::result::Result<String, String> {
    if cursor.peek() != Some('"') {
        return Ok(cursor.read_bare_word());
    }
    cursor.next_char();

    let mut value = String::new();
    loop {
        match cursor.next_char() {
            Some('"') => return Ok(value),
            Some(ch) => value.push(ch),
            None => return Err(format!("Missing closing quote after \"{}", value)),
        }
    }
}

fn resolve_relative(input_path: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match input_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(target),
        _ => target.to_path_buf(),
    }
}

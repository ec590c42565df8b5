//! Parser for parenthesized biomass literals such as `(150)`.
//!
//! Grammar: `WS* "(" WS* INTEGER WS* ")"` with the integer in `[0, 500000]`.
//! The parser consumes exactly the literal; on failure the cursor is left at
//! the point where reading stopped.

use crate::constants::{BIOMASS_UNIT, MAX_BIOMASS_LITERAL, MIN_BIOMASS_LITERAL};
use crate::error::{BiomassLiteralCause, CommunityError, Result};
use crate::reader::CharCursor;
use std::num::IntErrorKind;

/// A biomass value read from a `(N)` literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiomassValue {
    pub value: u32,
    pub unit: &'static str,
    /// The literal exactly as consumed, from `(` to `)`
    pub text: String,
}

/// Read one biomass literal from the cursor
pub fn read_biomass(cursor: &mut CharCursor<'_>) -> Result<BiomassValue> {
    cursor.skip_whitespace();

    match cursor.peek() {
        None => {
            return Err(CommunityError::biomass_literal(
                "",
                BiomassLiteralCause::MissingValue,
            ));
        }
        Some('(') => {}
        Some(_) => {
            let word = cursor.read_bare_word();
            return Err(CommunityError::biomass_literal(
                word,
                BiomassLiteralCause::MissingOpenParen,
            ));
        }
    }

    let mut literal = String::new();
    if let Some(open) = cursor.next_char() {
        literal.push(open);
    }
    literal.push_str(&cursor.read_whitespace());

    let token = cursor.read_word(')');
    if token.is_empty() {
        return Err(CommunityError::biomass_literal(
            literal,
            BiomassLiteralCause::EmptyToken,
        ));
    }
    literal.push_str(&token);

    let value = parse_token(&token).map_err(|cause| CommunityError::biomass_literal(literal.clone(), cause))?;

    literal.push_str(&cursor.read_whitespace());
    match cursor.next_char() {
        None => Err(CommunityError::biomass_literal(
            literal,
            BiomassLiteralCause::MissingCloseParen,
        )),
        Some(')') => {
            literal.push(')');
            Ok(BiomassValue {
                value,
                unit: BIOMASS_UNIT,
                text: literal,
            })
        }
        Some(other) => {
            literal.push(other);
            Err(CommunityError::biomass_literal(
                literal,
                BiomassLiteralCause::UnexpectedCharacter(other),
            ))
        }
    }
}

/// Parse a complete string holding a single biomass literal
pub fn parse_biomass(input: &str) -> Result<BiomassValue> {
    read_biomass(&mut CharCursor::new(input))
}

fn parse_token(token: &str) -> std::result::Result<u32, BiomassLiteralCause> {
    let value = token.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            BiomassLiteralCause::OutOfRange(token.to_string())
        }
        _ => BiomassLiteralCause::NonNumeric(token.to_string()),
    })?;

    if !(MIN_BIOMASS_LITERAL..=MAX_BIOMASS_LITERAL).contains(&value) {
        return Err(BiomassLiteralCause::OutOfRange(token.to_string()));
    }

    u32::try_from(value).map_err(|_| BiomassLiteralCause::OutOfRange(token.to_string()))
}

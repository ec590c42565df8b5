//! Character-level reading primitives for text inputs.
//!
//! A [`CharCursor`] walks a string one character at a time. Readers built on
//! it never roll back: after a failure the cursor stays where reading stopped.

use std::iter::Peekable;
use std::str::Chars;

/// Forward-only cursor over the characters of a string
#[derive(Debug, Clone)]
pub struct CharCursor<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> CharCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Next character without consuming it
    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consume and return the next character
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += 1;
        Some(ch)
    }

    /// Number of characters consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Consume a maximal, possibly empty, run of whitespace
    pub fn read_whitespace(&mut self) -> String {
        self.read_while(char::is_whitespace)
    }

    /// Skip whitespace without keeping it
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    /// Consume a maximal run of characters that are neither whitespace nor `delimiter`.
    ///
    /// Stops at the delimiter, at whitespace or at end of input; callers tell
    /// these apart by peeking afterwards.
    pub fn read_word(&mut self, delimiter: char) -> String {
        self.read_while(|ch| !ch.is_whitespace() && ch != delimiter)
    }

    /// Consume a maximal run of non-whitespace characters
    pub fn read_bare_word(&mut self) -> String {
        self.read_while(|ch| !ch.is_whitespace())
    }

    /// Consume everything that is left
    pub fn read_rest(&mut self) -> String {
        self.read_while(|_| true)
    }

    fn read_while(&mut self, mut accept: impl FnMut(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.next_char();
        }
        text
    }
}

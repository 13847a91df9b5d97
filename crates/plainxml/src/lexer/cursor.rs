//! Byte cursor for input navigation

use crate::error::Pos;

/// Cursor over UTF-8 text with position tracking.
///
/// The cursor walks bytes. Markup delimiters are all ASCII, so every offset
/// the tokenizer stops at is also a char boundary and slices stay valid.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    /// Create cursor over text
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Peek at byte ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.input
            .as_bytes()
            .get(self.pos.saturating_add(ahead))
            .copied()
    }

    /// Advance cursor by one byte
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Advance until `stop` is under the cursor or input ends.
    /// Returns whether `stop` was found.
    pub fn advance_until(&mut self, stop: u8) -> bool {
        while let Some(b) = self.current() {
            if b == stop {
                return true;
            }
            self.advance();
        }
        false
    }

    /// Get current position
    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    /// Check if at end of input
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get current position index
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Get text from start to current position
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

//! Markup tokenizer

use tracing::trace;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::cursor::Cursor;
use crate::lexer::token::{Token, TokenKind};

/// Tokenizer that splits markup text into tags and values.
///
/// No escapes are interpreted: a literal `<` or `>` inside text or an
/// attribute value changes where tokens split.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer over input text
    pub const fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Whether unconsumed input remains
    pub const fn has_next(&self) -> bool {
        !self.cursor.is_eof()
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let start = self.cursor.position();

        let kind = match self.cursor.current() {
            None => return Ok(Token::end_of_string(Span::new(start, start))),
            Some(b'<') if self.cursor.peek(1) == Some(b'/') => {
                self.lex_tag()?;
                TokenKind::TagEnd
            }
            Some(b'<') => {
                self.lex_tag()?;
                if self.cursor.slice_from(start.offset).ends_with("/>") {
                    TokenKind::TagSelfEnd
                } else {
                    TokenKind::TagStart
                }
            }
            Some(_) => {
                self.cursor.advance_until(b'<');
                TokenKind::Value
            }
        };

        let end = self.cursor.position();
        let text = self.cursor.slice_from(start.offset);
        trace!(kind = kind.name(), text, "token");
        Ok(Token::new(kind, text, Span::new(start, end)))
    }

    /// Consume a tag up to and including its closing `>`
    fn lex_tag(&mut self) -> Result<()> {
        let start = self.cursor.position();
        if !self.cursor.advance_until(b'>') {
            return Err(Error::with_message(
                ErrorKind::UnterminatedTag,
                Span::new(start, self.cursor.position()),
                "unterminated tag: missing '>'",
            ));
        }
        self.cursor.advance();
        Ok(())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => {
                if token.kind == TokenKind::EndOfString {
                    None
                } else {
                    Some(Ok(token))
                }
            }
            Err(e) => {
                // Skip the rest so iteration terminates after an error
                while self.cursor.current().is_some() {
                    self.cursor.advance();
                }
                Some(Err(e))
            }
        }
    }
}

//! Token types for the markup tokenizer

use crate::error::Span;

/// Markup token types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name attrs>`
    TagStart,
    /// `</name>`
    TagEnd,
    /// `<name attrs/>`
    TagSelfEnd,
    /// Text between tags, possibly empty
    Value,
    /// End of input
    EndOfString,
}

impl TokenKind {
    /// Get token name for error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::TagStart => "start tag",
            Self::TagEnd => "end tag",
            Self::TagSelfEnd => "self-closing tag",
            Self::Value => "text",
            Self::EndOfString => "end of input",
        }
    }

    /// Check if token opens an element
    pub const fn is_tag_open(self) -> bool {
        matches!(self, Self::TagStart | Self::TagSelfEnd)
    }
}

/// Token with its raw source text and location
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw text, including the angle brackets for tags
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub const fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub const fn end_of_string(span: Span) -> Self {
        Self {
            kind: TokenKind::EndOfString,
            text: "",
            span,
        }
    }
}

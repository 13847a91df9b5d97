//! Stack-based document parser
//!
//! The parser pulls tokens from the [`Tokenizer`] and keeps one frame per
//! open element: the element's [`NodeId`] and the exact close tag it
//! expects. Close tags are matched by plain string equality against the
//! innermost frame.

use tracing::debug;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::model::{Attribute, Document, NodeId};

/// Configuration for the parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// An element that has been opened and not yet closed
#[derive(Debug)]
struct Frame {
    node: NodeId,
    close_tag: String,
}

/// Name and attributes pulled out of a raw start or self-closing tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute>,
}

impl Tag<'_> {
    /// The close tag this element must be ended with
    pub fn close_tag(&self) -> String {
        format!("</{}>", self.name)
    }
}

/// Document parser
#[derive(Debug)]
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    input_len: usize,
    config: Config,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a str, config: Config) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            input_len: input.len(),
            config,
        }
    }

    /// Parse the whole input into a document.
    ///
    /// The first token must open the root element. Every element opened must
    /// be closed before the input ends, and only whitespace may follow the
    /// root's close tag.
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                0,
                1,
                1,
            ));
        }

        let first = self.tokenizer.next_token()?;
        if !first.kind.is_tag_open() {
            return Err(Error::new(
                ErrorKind::Expected {
                    expected: "root element".to_string(),
                    found: first.kind.name().to_string(),
                },
                first.span,
            ));
        }

        let tag = read_tag(&first);
        let mut doc = Document::new(tag.name);
        let root = doc.root();
        let mut stack: Vec<Frame> = Vec::new();
        if first.kind == TokenKind::TagStart {
            self.push(&mut stack, root, tag.close_tag(), first.span)?;
        }
        for attribute in tag.attributes {
            doc.root_node_mut().push_attribute(attribute);
        }

        let mut end = first.span.end;
        while self.tokenizer.has_next() {
            let token = self.tokenizer.next_token()?;
            end = token.span.end;

            let Some(top) = stack.last() else {
                if token.kind == TokenKind::Value && token.text.trim().is_empty() {
                    continue;
                }
                return Err(Error::new(ErrorKind::TrailingContent, token.span));
            };
            let parent = top.node;

            match token.kind {
                TokenKind::TagStart => {
                    let tag = read_tag(&token);
                    let close_tag = tag.close_tag();
                    let id = append_tag(&mut doc, parent, tag);
                    self.push(&mut stack, id, close_tag, token.span)?;
                }
                TokenKind::TagEnd => {
                    if token.text != top.close_tag {
                        return Err(Error::new(
                            ErrorKind::UnbalancedEndTag {
                                expected: top.close_tag.clone(),
                                found: token.text.to_string(),
                            },
                            token.span,
                        ));
                    }
                    stack.pop();
                }
                TokenKind::TagSelfEnd => {
                    append_tag(&mut doc, parent, read_tag(&token));
                }
                TokenKind::Value => {
                    doc.node_mut(parent).set_value(token.text);
                }
                TokenKind::EndOfString => break,
            }
        }

        if let Some(open) = stack.last() {
            let name = doc.node(open.node).name().to_string();
            return Err(Error::new(
                ErrorKind::UnclosedElement { name },
                Span::new(end, end),
            ));
        }

        debug!(nodes = doc.node_count(), "parsed document");
        Ok(doc)
    }

    fn push(
        &self,
        stack: &mut Vec<Frame>,
        node: NodeId,
        close_tag: String,
        span: Span,
    ) -> Result<()> {
        stack.push(Frame { node, close_tag });
        if self.config.max_depth > 0 && stack.len() > usize::from(self.config.max_depth) {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                span,
            ));
        }
        Ok(())
    }
}

fn append_tag(doc: &mut Document, parent: NodeId, tag: Tag<'_>) -> NodeId {
    let id = doc.append_child(parent, tag.name);
    let node = doc.node_mut(id);
    for attribute in tag.attributes {
        node.push_attribute(attribute);
    }
    id
}

/// Split a raw start or self-closing tag into its name and attributes.
///
/// The name runs up to the first space. The rest is split on whitespace and
/// each piece containing a `"` becomes `name="value"`; pieces without a quote
/// are dropped. Values containing spaces or quotes are not supported.
pub fn read_tag<'a>(token: &Token<'a>) -> Tag<'a> {
    let inner = token.text.strip_prefix('<').unwrap_or(token.text);
    let inner = if token.kind == TokenKind::TagSelfEnd {
        inner.strip_suffix("/>")
    } else {
        inner.strip_suffix('>')
    }
    .unwrap_or(inner);

    match inner.split_once(' ') {
        Some((name, region)) => Tag {
            name,
            attributes: read_attributes(region),
        },
        None => Tag {
            name: inner,
            attributes: Vec::new(),
        },
    }
}

fn read_attributes(region: &str) -> Vec<Attribute> {
    region
        .split_whitespace()
        .filter_map(|piece| {
            let (name, rest) = piece.split_once('"')?;
            let name = name.strip_suffix('=').unwrap_or(name);
            let value = rest.split_once('"').map_or(rest, |(value, _)| value);
            Some(Attribute::new(name, value))
        })
        .collect()
}

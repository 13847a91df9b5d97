//! plainxml - minimal tag/attribute/text documents
//!
//! A tokenizer, a stack-based parser and a writer for a small subset of
//! XML: elements with attributes, text on leaves, and an optional
//! `<?xml ...?>` prolog. There are no entities, comments, CDATA or
//! namespaces.
//!
//! # Quick Start
//!
//! ```
//! use plainxml::{from_str, to_string, WriteConfig};
//! # fn main() -> Result<(), plainxml::Error> {
//! let doc = from_str(r#"<config mode="fast"><level>3</level></config>"#)?;
//! let root = doc.root_node();
//! assert_eq!(root.attribute_value("mode"), Some("fast"));
//! assert_eq!(doc.node(root.child(0)).value(), "3");
//!
//! let text = to_string(&doc, WriteConfig::compact());
//! assert_eq!(text, r#"<config mode="fast"><level>3</level></config>"#);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, FileError, Pos, Result, Span};

pub mod lexer;
pub use lexer::{Token, TokenKind, Tokenizer};

pub mod model;
pub use model::{Attribute, Document, Node, NodeId};

pub mod parser;
pub use parser::{Config, Parser};

pub mod writer;
pub use writer::{WriteConfig, Writer};

pub mod document;
pub use document::{
    parse_document, read_document, read_document_from_stream,
    read_document_from_stream_with_config, read_document_with_config, write_document,
    write_document_to_stream,
};

pub mod tasks;
pub use tasks::{Task, TaskList, TaskStore, XmlTaskStore};

/// Parse document text with default limits
pub fn from_str(s: &str) -> Result<Document> {
    parse_document(s, Config::default())
}

/// Parse document bytes with default limits
pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        Error::with_message(
            ErrorKind::File(FileError::FailedToRead),
            Span::empty(),
            format!("input is not valid UTF-8: {e}"),
        )
    })?;
    from_str(text)
}

/// Parse with custom limits
pub fn from_str_with_config(s: &str, config: Config) -> Result<Document> {
    parse_document(s, config)
}

/// Render a document with the given output options
pub fn to_string(document: &Document, config: WriteConfig) -> String {
    document.to_string_with(config)
}

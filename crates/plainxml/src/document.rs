//! File and stream entry points
//!
//! Reading strips every `\n`, drops everything up to and including the
//! first `?>` (the prolog, if any) and parses the rest. The version declared
//! in the prolog is kept on the document so a re-write reproduces it.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument, warn};

use crate::error::{Error, FileError, Pos, Result, Span};
use crate::model::{Document, DEFAULT_VERSION};
use crate::parser::{Config, Parser};
use crate::writer::{WriteConfig, Writer};

/// Read and parse a document from a file.
///
/// File problems come back as [`ErrorKind::File`](crate::ErrorKind::File):
/// `FailedToOpen` when the file cannot be opened, `FailedToRead` when its
/// bytes cannot be read as UTF-8 text, `FileEmpty` when it has no bytes.
/// Malformed content is reported with the parser's own error kinds.
pub fn read_document(path: impl AsRef<Path>) -> Result<Document> {
    read_document_with_config(path, Config::default())
}

/// Like [`read_document`], with custom parser limits
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_document_with_config(path: impl AsRef<Path>, config: Config) -> Result<Document> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|e| {
        warn!("failed to open: {e}");
        Error::file(
            FileError::FailedToOpen,
            format!("cannot open {}: {e}", path.display()),
        )
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| {
        warn!("failed to read: {e}");
        Error::file(
            FileError::FailedToRead,
            format!("cannot read {}: {e}", path.display()),
        )
    })?;

    if bytes.is_empty() {
        warn!("file is empty");
        return Err(Error::file(
            FileError::FileEmpty,
            format!("{} is empty", path.display()),
        ));
    }

    let text = String::from_utf8(bytes).map_err(|e| {
        Error::file(
            FileError::FailedToRead,
            format!("{} is not valid UTF-8: {e}", path.display()),
        )
    })?;

    debug!(bytes = text.len(), "read file");
    parse_document(&text, config)
}

/// Render a document and write it to a file, replacing any existing content.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_document(
    path: impl AsRef<Path>,
    document: &Document,
    config: WriteConfig,
) -> Result<()> {
    let path = path.as_ref();

    let mut file = File::create(path).map_err(|e| {
        warn!("failed to create: {e}");
        Error::file(
            FileError::FailedToOpen,
            format!("cannot open {} for writing: {e}", path.display()),
        )
    })?;

    Writer::new(document, config)
        .write_to(&mut file)
        .map_err(|e| {
            warn!("failed to write: {e}");
            Error::file(
                FileError::FailedToWrite,
                format!("cannot write {}: {e}", path.display()),
            )
        })
}

/// Read and parse a document from an already-open stream.
///
/// Meant for embedding in larger streams such as stdin; use
/// [`read_document`] for files so failures map to [`FileError`] codes.
/// A stream with no content (after newline stripping) yields an empty
/// [`Document::default`].
pub fn read_document_from_stream<R: Read>(reader: &mut R) -> Result<Document> {
    read_document_from_stream_with_config(reader, Config::default())
}

/// Like [`read_document_from_stream`], with custom parser limits
pub fn read_document_from_stream_with_config<R: Read>(
    reader: &mut R,
    config: Config,
) -> Result<Document> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e))?;

    if strip_newlines(&text).is_empty() {
        debug!("stream is empty");
        return Ok(Document::default());
    }
    parse_document(&text, config)
}

/// Render a document into an already-open stream such as stdout
pub fn write_document_to_stream<W: Write>(
    writer: &mut W,
    document: &Document,
    config: WriteConfig,
) -> Result<()> {
    Writer::new(document, config)
        .write_to(writer)
        .map_err(|e| Error::io(&e))
}

/// Parse document text: strip newlines, skip the prolog, run the parser.
///
/// Error spans refer to positions in `text` as given, newlines and prolog
/// included.
pub fn parse_document(text: &str, config: Config) -> Result<Document> {
    let stripped = strip_newlines(text);
    let (version, body) = split_prolog(&stripped);
    let body_start = stripped.len() - body.len();
    let mut document = Parser::with_config(body, config)
        .parse()
        .map_err(|err| relocate(err, text, body_start))?;
    document.set_version(version.unwrap_or(DEFAULT_VERSION));
    Ok(document)
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|&c| c != '\n').collect()
}

/// Move an error span over the stripped body back onto the unstripped text
fn relocate(err: Error, text: &str, body_start: usize) -> Error {
    let span = err.span();
    if span == Span::empty() {
        return err;
    }
    let start = locate(text, body_start + span.start.offset);
    // End is exclusive: place it right after the last byte of the span
    let end = match span.end.offset.checked_sub(1) {
        Some(last) if span.end.offset > span.start.offset => {
            let last = locate(text, body_start + last);
            Pos::new(last.offset + 1, last.line, last.col + 1)
        }
        _ => start,
    };
    err.with_span(Span::new(start, end))
}

/// Position in `text` of the byte that sits at `stripped` once every `\n`
/// has been removed. Past the end maps to the end of `text`.
fn locate(text: &str, stripped: usize) -> Pos {
    let (mut seen, mut line, mut col) = (0, 1, 1);
    for (offset, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            line += 1;
            col = 1;
            continue;
        }
        if seen == stripped {
            return Pos::new(offset, line, col);
        }
        seen += 1;
        col += 1;
    }
    Pos::new(text.len(), line, col)
}

/// Split off everything up to and including the first `?>`.
/// Returns the declared version, if the prolog states one, and the body.
fn split_prolog(text: &str) -> (Option<&str>, &str) {
    let Some((prolog, body)) = text.split_once("?>") else {
        return (None, text);
    };
    let version = prolog
        .split_once("version=\"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(version, _)| version);
    (version, body)
}

impl Document {
    /// Parse document text with default limits
    pub fn parse_str(text: &str) -> Result<Self> {
        parse_document(text, Config::default())
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

/// Prolog and indentation, as written to files by default
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(WriteConfig::default()))
    }
}

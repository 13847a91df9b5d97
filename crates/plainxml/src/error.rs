//! Error types for plainxml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Outcome of a file-backed read or write.
///
/// The numeric codes are stable and double as process exit codes for the
/// CLI. Success is code 0 and is represented by `Ok(..)`, so it has no
/// variant here.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileError {
    #[error("failed to open file")]
    FailedToOpen = 1,
    #[error("file is empty")]
    FileEmpty = 2,
    #[error("failed to read file")]
    FailedToRead = 3,
    #[error("failed to write file")]
    FailedToWrite = 4,
}

impl FileError {
    /// Code reported for a successful read or write.
    pub const SUCCESS_CODE: u8 = 0;

    /// Stable numeric code of this outcome
    pub const fn code(self) -> u8 {
        match self {
            Self::FailedToOpen => 1,
            Self::FileEmpty => 2,
            Self::FailedToRead => 3,
            Self::FailedToWrite => 4,
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `<` with no matching `>` before the end of input
    UnterminatedTag,
    Expected { expected: String, found: String },
    /// A close tag that does not match the innermost open element
    UnbalancedEndTag { expected: String, found: String },
    /// Input ended while an element was still open
    UnclosedElement { name: String },
    /// Non-whitespace content after the root element closed
    TrailingContent,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    /// A `task` element without its five positional children
    MalformedTask { index: usize },
    File(FileError),
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedTag => write!(f, "unterminated tag"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnbalancedEndTag { expected, found } => {
                write!(f, "malformed document: unbalanced end tag {found}, expected {expected}")
            }
            Self::UnclosedElement { name } => {
                write!(f, "malformed document: element <{name}> is never closed")
            }
            Self::TrailingContent => write!(f, "content after the root element"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::MalformedTask { index } => write!(f, "task #{index} is missing fields"),
            Self::File(err) => write!(f, "{err}"),
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for plainxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The same error reported at `span`
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Error for a failed file operation
    pub fn file(err: FileError, message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::File(err), Span::empty(), message)
    }

    /// Error for a failed stream operation
    pub fn io(err: &std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, Span::empty(), err.to_string())
    }

    /// The file outcome, if this error came from the file facade
    pub fn file_error(&self) -> Option<FileError> {
        match self.kind {
            ErrorKind::File(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the input itself was malformed, as opposed to an I/O failure
    pub fn is_malformed(&self) -> bool {
        !matches!(self.kind, ErrorKind::File(_) | ErrorKind::Io)
    }

    /// Process exit code: the file code for file failures, 3 for stream
    /// failures and 5 for malformed input.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::File(err) => err.code(),
            ErrorKind::Io => FileError::FailedToRead.code(),
            _ => 5,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::empty() {
            write!(f, "error: {}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for plainxml
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_file_error_codes_are_stable() {
        assert_eq!(FileError::SUCCESS_CODE, 0);
        assert_eq!(FileError::FailedToOpen.code(), 1);
        assert_eq!(FileError::FileEmpty.code(), 2);
        assert_eq!(FileError::FailedToRead.code(), 3);
        assert_eq!(FileError::FailedToWrite.code(), 4);
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(ErrorKind::UnterminatedTag, 10, 1, 11);
        let display = err.to_string();
        assert!(display.contains("error at 10:1:11"));
        assert!(display.contains("unterminated tag"));
    }

    #[test]
    fn test_file_error_accessors() {
        let err = Error::file(FileError::FileEmpty, "tasks.xml is empty");
        assert_eq!(err.file_error(), Some(FileError::FileEmpty));
        assert_eq!(err.exit_code(), 2);
        assert!(!err.is_malformed());
        assert_eq!(err.to_string(), "error: tasks.xml is empty");
    }

    #[test]
    fn test_parse_error_exit_code() {
        let err = Error::at(ErrorKind::TrailingContent, 0, 1, 1);
        assert!(err.is_malformed());
        assert_eq!(err.file_error(), None);
        assert_eq!(err.exit_code(), 5);
    }
}

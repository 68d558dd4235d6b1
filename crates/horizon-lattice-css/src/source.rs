//! Source text and locations.
//!
//! The pipeline reads its input through [`CharStream`], which pairs the text
//! with the name that diagnostics report. [`SourceText`] is the owned
//! implementation used by callers that load stylesheets from disk or memory.

use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// A character stream with a name used verbatim in diagnostics.
pub trait CharStream {
    /// The name reported in problem locations (usually a file path).
    fn source_name(&self) -> &str;

    /// The full text of the stream.
    fn text(&self) -> &str;
}

/// Owned stylesheet source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    name: String,
    text: String,
}

impl SourceText {
    /// Create a source from a name and its text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Create a source from raw bytes.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD, so any byte input
    /// yields a stream the lexer can consume.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(name, String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a stylesheet from disk. The path becomes the source name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(
            target: crate::logging::targets::SOURCE,
            "Loaded stylesheet {} ({} bytes)",
            path.display(),
            bytes.len()
        );
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }
}

impl CharStream for SourceText {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl<T: CharStream + ?Sized> CharStream for &T {
    fn source_name(&self) -> &str {
        (**self).source_name()
    }

    fn text(&self) -> &str {
        (**self).text()
    }
}

/// A line/column position (both 1-indexed).
///
/// Columns count UTF-16 code units, matching the underlying tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A start/end range in the source. `end` points just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    /// First character of the range.
    pub start: Position,
    /// Position just after the range.
    pub end: Position,
}

impl Span {
    /// Create a span.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `position`.
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

//! Error types for the CSS frontend.
//!
//! Recoverable problems in stylesheet text are reported through a
//! [`ProblemSink`](crate::problems::ProblemSink) instead. [`Error`] covers the
//! failures that stop work altogether: unreadable sources and input the
//! pipeline refuses to descend into.

use std::path::PathBuf;

use crate::source::Position;

/// Result type alias for CSS frontend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of ordinary diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read stylesheet '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blocks nested deeper than the configured limit.
    #[error("Blocks nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a nesting error.
    pub fn nesting_too_deep(limit: usize, position: Position) -> Self {
        Self::NestingTooDeep { limit, position }
    }
}

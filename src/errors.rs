//! Shared error types for coverpush.
//!
//! Parse failures abort the whole profile: a truncated or corrupt profile
//! cannot be trusted, so there is no partial recovery. `FileUnreadable` is
//! scoped to a single source file and whether it aborts the batch is decided
//! by [`ReadPolicy`](crate::config::ReadPolicy).

use crate::profile::CoverMode;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for coverpush operations
#[derive(Debug, Error)]
pub enum Error {
    /// First line of a profile is missing or is not `mode: set|count|atomic`
    #[error("bad mode line: {line:?}")]
    MalformedHeader { line: String },

    /// A block line doesn't match `file:l.c,l.c stmts count`
    #[error("line {line_number} doesn't match the expected block format: {line:?}")]
    MalformedBlockLine { line_number: usize, line: String },

    /// Source file named by a profile could not be located or read
    #[error("can't read {name}: {source}")]
    FileUnreadable {
        name: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Profiles from different runs were recorded in different modes
    #[error("cannot merge {found} profile into {expected} profile")]
    ModeMismatch {
        expected: CoverMode,
        found: CoverMode,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `go test` failed to produce a profile
    #[error("test run failed: {0}")]
    TestRun(String),

    /// The coverage service rejected the job
    #[error("upload rejected: {0}")]
    Upload(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Git errors
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a block-line error for the 1-based `line_number`
    pub fn malformed_block(line_number: usize, line: impl Into<String>) -> Self {
        Self::MalformedBlockLine {
            line_number,
            line: line.into(),
        }
    }

    /// Create an unreadable-file error with optional resolved path
    pub fn unreadable(
        name: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileUnreadable {
            name: name.into(),
            path,
            source,
        }
    }

    /// True for errors produced while parsing profile text
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. } | Self::MalformedBlockLine { .. }
        )
    }
}

/// Result type alias for coverpush operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_block_display() {
        let err = Error::malformed_block(3, "garbage");
        assert_eq!(
            err.to_string(),
            "line 3 doesn't match the expected block format: \"garbage\""
        );
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_unreadable_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::unreadable("pkg/a.go", None, io);
        assert!(!err.is_parse_error());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "can't read pkg/a.go: gone");
    }

    #[test]
    fn test_mode_mismatch_display() {
        let err = Error::ModeMismatch {
            expected: CoverMode::Count,
            found: CoverMode::Set,
        };
        assert_eq!(err.to_string(), "cannot merge set profile into count profile");
    }
}

//! Application error types.
//!
//! One enum for the whole crate. The verse engine only produces the
//! reference, range-order and canon variants; the rest belong to the
//! journal, configuration and import layers.

use thiserror::Error;

use crate::bible::VerseId;

/// Crate result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types with enough context for the caller to pick its own wording
#[derive(Debug, Error)]
pub enum Error {
    /// A reference matched structurally but named no known book
    #[error("Unknown book: {name}{}", suggestion.as_ref().map(|s| format!(" (did you mean {s}?)")).unwrap_or_default())]
    UnknownBook {
        /// Book name as written in the reference.
        name: String,
        /// Closest canonical book name, if one is reasonably close.
        suggestion: Option<String>,
    },

    /// A reference matched structurally but decoded to a range that does not exist
    #[error("Invalid verse range: {reference}")]
    InvalidRange {
        /// The offending reference or range, as text.
        reference: String,
    },

    /// Two identifiers were passed in the wrong order
    #[error("Verse {start} must come before verse {end}")]
    OutOfOrder {
        /// Identifier expected to come first.
        start: VerseId,
        /// Identifier expected to come last.
        end: VerseId,
    },

    /// Canon table violates its structural invariants
    #[error("Malformed canon table: {message}")]
    Canon {
        /// What is wrong with the table.
        message: String,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// JSON (de)serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Journal store error (missing entry, rejected write)
    #[error("Journal error: {0}")]
    Store(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a canon table error
    pub fn canon(message: impl Into<String>) -> Self {
        Self::Canon { message: message.into() }
    }

    /// Create an invalid range error
    pub fn invalid_range(reference: impl Into<String>) -> Self {
        Self::InvalidRange { reference: reference.into() }
    }

    /// True for the two reference errors a user can fix by retyping.
    pub const fn is_reference_error(&self) -> bool {
        matches!(self, Self::UnknownBook { .. } | Self::InvalidRange { .. })
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn unknown_book_mentions_suggestion() {
        let err = Error::UnknownBook {
            name: "Genisis".to_string(),
            suggestion: Some("Genesis".to_string()),
        };
        assert_eq!(err.to_string(), "Unknown book: Genisis (did you mean Genesis?)");

        let err = Error::UnknownBook { name: "Nope".to_string(), suggestion: None };
        assert_eq!(err.to_string(), "Unknown book: Nope");
    }

    #[test]
    fn reference_errors_are_classified() {
        assert!(Error::invalid_range("Genesis 51").is_reference_error());
        assert!(!Error::canon("empty").is_reference_error());
        assert!(!Error::Store("missing".into()).is_reference_error());
    }
}

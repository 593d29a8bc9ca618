// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Training-side failures (fatal to a run, reported, never retried):
//   Schema       — dataset lacks the expected text column
//   Dataset      — dataset could not be read at all
//   Training     — empty corpus or trainer failure
//   Persistence  — model artifact could not be written/read
//
// Query-side failures (per query, always surfaced):
//   Validation   — the caller's input has the wrong shape
//   NotFound     — valid input, but not in the vocabulary
//   Internal     — anything else the embedding space reports
//
// Tokenization never produces an error: a malformed record
// degrades to an empty token sequence.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a query input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Empty or whitespace-only input
    Empty,
    /// Input made only of digit characters
    NumericOnly,
}

impl ValidationReason {
    /// Short machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            ValidationReason::Empty       => "empty",
            ValidationReason::NumericOnly => "numeric-only",
        }
    }

    /// Message shown to the caller
    pub fn message(self) -> &'static str {
        match self {
            ValidationReason::Empty => "Input word cannot be empty or just whitespace.",
            ValidationReason::NumericOnly => {
                "Numeric-only input is not allowed. Please provide an alphanumeric word."
            }
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset '{path}' has no '{column}' column")]
    Schema { path: PathBuf, column: String },

    #[error("cannot read dataset '{path}': {reason}")]
    Dataset { path: PathBuf, reason: String },

    #[error("training failed: {0}")]
    Training(String),

    #[error("model artifact '{path}': {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("invalid input ({0}): {msg}", msg = .0.message())]
    Validation(ValidationReason),

    #[error("Word '{0}' not found in vocabulary.")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn persistence(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::Persistence { path: path.into(), reason: reason.to_string() }
    }

    pub fn dataset(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::Dataset { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

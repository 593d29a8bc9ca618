// ============================================================
// Layer 3 — RawRecord Domain Type
// ============================================================
// Represents a single cell of the dataset's text column.
//
// Columnar files are loosely typed: a cell can hold a string,
// a null, or some other value (a number, a list...). Only
// strings carry text to tokenize; everything else is kept as
// a "not text" record so the corpus still has exactly one
// sequence per dataset row.

use serde::{Deserialize, Serialize};

/// One immutable dataset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// `None` when the cell was null or not a string
    text: Option<String>,
}

impl RawRecord {
    /// A record holding text.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()) }
    }

    /// A record whose cell was null or held a non-string value.
    pub fn not_text() -> Self {
        Self { text: None }
    }

    /// Borrow the text, if this record has any
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl From<&str> for RawRecord {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for RawRecord {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<Option<String>> for RawRecord {
    fn from(text: Option<String>) -> Self {
        Self { text }
    }
}

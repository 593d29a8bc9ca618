// ============================================================
// Layer 3 — Corpus Domain Type
// ============================================================
// A Corpus is what the embedding trainer consumes:
//   - one TokenSequence per dataset record
//   - order WITHIN a sequence matters (it is the context the
//     trainer's sliding window walks over)
//   - order ACROSS sequences does not
//   - empty sequences are allowed (records with no valid tokens)
//
// Example:
//   records: ["The user_id was 42", "np.array(h2o)", "42"]
//   corpus:  [["user_id"], ["np.array", "h2o"], []]

use serde::{Deserialize, Serialize};

/// A normalised token: 3+ characters, fewer than 5 digits.
pub type Token = String;

/// Ordered tokens produced from one record.
pub type TokenSequence = Vec<Token>;

/// The full training corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    sequences: Vec<TokenSequence>,
}

impl Corpus {
    pub fn new(sequences: Vec<TokenSequence>) -> Self {
        Self { sequences }
    }

    /// Number of sequences (equals the number of records)
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Total number of tokens across all sequences
    pub fn token_count(&self) -> usize {
        self.sequences.iter().map(Vec::len).sum()
    }

    /// True when at least one sequence holds a token.
    /// A corpus of only empty sequences gives the trainer nothing to learn.
    pub fn has_tokens(&self) -> bool {
        self.sequences.iter().any(|s| !s.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenSequence> {
        self.sequences.iter()
    }

    pub fn sequences(&self) -> &[TokenSequence] {
        &self.sequences
    }
}

impl FromIterator<TokenSequence> for Corpus {
    fn from_iter<I: IntoIterator<Item = TokenSequence>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

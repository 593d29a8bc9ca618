// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the core logic and its collaborators:
//
//   DatasetSource     — where raw records come from
//                       (ParquetLoader, JsonLinesLoader)
//   EmbeddingTrainer  — turns a Corpus into an EmbeddingSpace
//                       (Word2VecTrainer)
//   EmbeddingSpace    — nearest-neighbour lookups over vectors
//                       (WordVectors, or an in-memory fake in tests)
//   Persistable       — save/load an artifact keyed by path
//
// The application layer only sees these traits, so the
// tokenizer, corpus builder and query service are testable
// without training real vectors.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::corpus::Corpus;
use crate::domain::error::Result;
use crate::domain::hyperparameters::Hyperparameters;
use crate::domain::record::RawRecord;

// ─── DatasetSource ───────────────────────────────────────────────────────────
/// Anything that can produce the raw records of one text column.
pub trait DatasetSource {
    /// Load every record of `column`, in dataset order.
    /// Fails with `Error::Schema` if the column does not exist.
    fn load_column(&self, column: &str) -> Result<Vec<RawRecord>>;
}

// ─── EmbeddingTrainer ────────────────────────────────────────────────────────
/// The embedding-training collaborator.
pub trait EmbeddingTrainer {
    type Space: EmbeddingSpace;

    /// Train once over the whole corpus.
    fn train(&self, corpus: &Corpus, params: &Hyperparameters) -> Result<Self::Space>;
}

// ─── EmbeddingSpace ──────────────────────────────────────────────────────────
/// One (token, score) result of a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub token: String,
    pub score: f32,
}

impl Neighbor {
    pub fn new(token: impl Into<String>, score: f32) -> Self {
        Self { token: token.into(), score }
    }
}

/// Failure modes of a lookup, kept apart so callers can tell
/// "no such token" from "the space itself is broken".
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("token '{0}' is not in the vocabulary")]
    UnknownToken(String),

    #[error("{0}")]
    Backend(String),
}

/// A trained, read-only embedding space.
///
/// Implementations must be safe to query from many threads at once.
pub trait EmbeddingSpace: Send + Sync {
    fn contains(&self, token: &str) -> bool;

    fn vocabulary_len(&self) -> usize;

    /// Up to `k` nearest tokens by similarity, highest score first.
    fn nearest(&self, token: &str, k: usize) -> std::result::Result<Vec<Neighbor>, LookupError>;
}

// ─── Persistable ─────────────────────────────────────────────────────────────
/// Any component whose state can be saved to and restored from a path.
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}

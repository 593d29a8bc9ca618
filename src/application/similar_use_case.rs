// ============================================================
// Layer 2 — Similarity Query Service
// ============================================================
// Answers "which tokens are closest to this word?" against a
// trained embedding space loaded once at startup.
//
// Lifecycle of one query:
//
//   Received ──validate──► Validated ──lookup──► Found ──► Returned
//        │                      │
//        └─► Invalid            ├─► NotFound        ──► Reported
//            (Rejected)         └─► InternalFailure ──► Reported
//
// Validation only trims and checks the shape of the input. The
// trimmed string itself is the lookup key: queries are single
// words and are NOT run back through the corpus tokenizer, so
// "The" is looked up as "The", not lower-cased or stop-worded.
//
// The numeric-only rule here is separate from the
// tokenizer's digit filter (fewer than 5 digits): one decides what
// is queryable, the other what is trainable.
//
// The service holds no mutable state, so one instance can serve
// any number of concurrent queries.

use std::path::Path;

use crate::data::tokenizer::is_digits_only;
use crate::domain::error::{Error, Result, ValidationReason};
use crate::domain::traits::{EmbeddingSpace, LookupError, Neighbor, Persistable};
use crate::infra::model_store::TrainedModel;
use crate::ml::embedding::WordVectors;

/// Neighbours returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 5;

/// Trim the raw input and reject empty or numeric-only words.
pub fn validate_query(raw: &str) -> Result<&str> {
    let word = raw.trim();
    if word.is_empty() {
        return Err(Error::Validation(ValidationReason::Empty));
    }
    if is_digits_only(word) {
        return Err(Error::Validation(ValidationReason::NumericOnly));
    }
    Ok(word)
}

pub struct SimilarityService<S> {
    space: S,
}

impl<S: EmbeddingSpace> SimilarityService<S> {
    pub fn new(space: S) -> Self {
        Self { space }
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    /// Up to `k` nearest tokens to `raw`, highest score first.
    ///
    /// Ordering comes straight from the embedding space; ties are
    /// not re-sorted here.
    pub fn find_similar(&self, raw: &str, k: usize) -> Result<Vec<Neighbor>> {
        let word = validate_query(raw)?;

        match self.space.nearest(word, k) {
            Ok(neighbors) => {
                tracing::debug!("'{}' → {} neighbours", word, neighbors.len());
                Ok(neighbors)
            }
            Err(LookupError::UnknownToken(_)) => {
                tracing::debug!("'{}' not in vocabulary", word);
                Err(Error::NotFound(word.to_string()))
            }
            Err(LookupError::Backend(detail)) => {
                tracing::error!("Embedding lookup for '{}' failed: {}", word, detail);
                Err(Error::Internal(detail))
            }
        }
    }
}

impl SimilarityService<WordVectors> {
    /// Load the persisted model once and wrap it in a service.
    pub fn load(path: &Path) -> Result<Self> {
        let model = TrainedModel::load(path)?;
        Ok(Self::new(model.vectors))
    }
}

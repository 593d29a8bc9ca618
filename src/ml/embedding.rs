// ============================================================
// Layer 5 — Word Vectors (the trained embedding space)
// ============================================================
// A vocabulary plus one dense f32 vector per token, stored
// row-major in a single Vec:
//
//   vectors = [ v(tok0)[0..dim] | v(tok1)[0..dim] | ... ]
//
// Vocabulary order is frequency-descending (ties by first
// appearance), which is also the tie-break order for queries.
//
// Similarity is cosine:  cos(a, b) = a·b / (|a| |b|)
// Row norms are computed once when the space is built so a
// query is one dot product per vocabulary entry.
//
// The space is immutable after construction: many threads can
// query it at once with no locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::traits::{EmbeddingSpace, LookupError, Neighbor};

/// Serialised form: only the data that cannot be recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorsRecord {
    dim:     usize,
    vocab:   Vec<String>,
    counts:  Vec<u64>,
    vectors: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorsRecord", into = "VectorsRecord")]
pub struct WordVectors {
    dim:     usize,
    vocab:   Vec<String>,
    counts:  Vec<u64>,
    vectors: Vec<f32>,
    index:   HashMap<String, usize>,
    norms:   Vec<f32>,
}

impl WordVectors {
    /// Build a space from a vocabulary, its counts and a row-major
    /// matrix. Fails if the shapes disagree or a token repeats.
    pub fn new(
        vocab:   Vec<String>,
        counts:  Vec<u64>,
        dim:     usize,
        vectors: Vec<f32>,
    ) -> Result<Self, String> {
        if dim == 0 {
            return Err("vector dimension must be positive".to_string());
        }
        if counts.len() != vocab.len() {
            return Err(format!(
                "{} counts for {} vocabulary entries",
                counts.len(),
                vocab.len()
            ));
        }
        let expected = vocab
            .len()
            .checked_mul(dim)
            .ok_or_else(|| format!("{} x {} matrix is too large", vocab.len(), dim))?;
        if vectors.len() != expected {
            return Err(format!(
                "matrix holds {} values, expected {} x {}",
                vectors.len(),
                vocab.len(),
                dim
            ));
        }

        let mut index = HashMap::with_capacity(vocab.len());
        for (i, token) in vocab.iter().enumerate() {
            if index.insert(token.clone(), i).is_some() {
                return Err(format!("duplicate vocabulary entry '{token}'"));
            }
        }

        let norms = vectors
            .chunks_exact(dim)
            .map(|row| row.iter().map(|x| x * x).sum::<f32>().sqrt())
            .collect();

        Ok(Self { dim, vocab, counts, vectors, index, norms })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Tokens in vocabulary order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocab
    }

    /// Training-corpus frequency of a token
    pub fn count(&self, token: &str) -> Option<u64> {
        self.index.get(token).map(|&i| self.counts[i])
    }

    pub fn vector(&self, token: &str) -> Option<&[f32]> {
        self.index.get(token).map(|&i| self.row(i))
    }

    /// Cosine similarity between two vocabulary tokens
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let &i = self.index.get(a)?;
        let &j = self.index.get(b)?;
        Some(self.cosine(i, j))
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.vectors[i * self.dim..(i + 1) * self.dim]
    }

    fn cosine(&self, i: usize, j: usize) -> f32 {
        let denom = self.norms[i] * self.norms[j];
        if denom == 0.0 {
            return 0.0;
        }
        let dot: f32 = self.row(i).iter().zip(self.row(j)).map(|(a, b)| a * b).sum();
        dot / denom
    }
}

impl EmbeddingSpace for WordVectors {
    fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    fn vocabulary_len(&self) -> usize {
        self.vocab.len()
    }

    fn nearest(&self, token: &str, k: usize) -> Result<Vec<Neighbor>, LookupError> {
        let &query = self
            .index
            .get(token)
            .ok_or_else(|| LookupError::UnknownToken(token.to_string()))?;

        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = (0..self.vocab.len())
            .filter(|&i| i != query)
            .map(|i| (i, self.cosine(query, i)))
            .collect();

        if let Some((i, _)) = scored.iter().find(|(_, s)| !s.is_finite()) {
            return Err(LookupError::Backend(format!(
                "non-finite similarity between '{}' and '{}'",
                token, self.vocab[*i]
            )));
        }

        // sort_by is stable: equal scores stay in vocabulary order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| Neighbor::new(self.vocab[i].clone(), score))
            .collect())
    }
}

impl TryFrom<VectorsRecord> for WordVectors {
    type Error = String;

    fn try_from(r: VectorsRecord) -> Result<Self, Self::Error> {
        WordVectors::new(r.vocab, r.counts, r.dim, r.vectors)
    }
}

impl From<WordVectors> for VectorsRecord {
    fn from(w: WordVectors) -> Self {
        VectorsRecord { dim: w.dim, vocab: w.vocab, counts: w.counts, vectors: w.vectors }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> WordVectors {
        let vocab = ["main", "func", "init", "zero", "other"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        #[rustfmt::skip]
        let vectors = vec![
            1.0, 0.0,   // main
            0.9, 0.1,   // func
            0.9, 0.1,   // init  (ties with func)
            0.0, 0.0,   // zero vector
            -1.0, 0.0,  // other
        ];
        WordVectors::new(vocab, vec![5, 4, 3, 2, 1], 2, vectors).unwrap()
    }

    #[test]
    fn test_nearest_orders_by_score_and_excludes_query() {
        let n = space().nearest("main", 10).unwrap();
        let tokens: Vec<&str> = n.iter().map(|n| n.token.as_str()).collect();
        assert_eq!(tokens, vec!["func", "init", "zero", "other"]);
        assert!(n.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_vocabulary_order() {
        let n = space().nearest("main", 2).unwrap();
        assert_eq!(n[0].token, "func");
        assert_eq!(n[1].token, "init");
        assert_eq!(n[0].score, n[1].score);
    }

    #[test]
    fn test_k_limits_results() {
        assert_eq!(space().nearest("main", 1).unwrap().len(), 1);
        assert!(space().nearest("main", 0).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_token() {
        let err = space().nearest("zz_unknown_token", 5).unwrap_err();
        assert!(matches!(err, LookupError::UnknownToken(t) if t == "zz_unknown_token"));
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(space().similarity("main", "zero"), Some(0.0));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = WordVectors::new(vec!["a".into()], vec![1], 3, vec![0.0; 2]).unwrap_err();
        assert!(err.contains("expected"));
        let err = WordVectors::new(vec!["a".into(), "a".into()], vec![1, 1], 1, vec![0.0; 2])
            .unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_oversized_shape_rejected() {
        let vocab = vec!["a".into(), "b".into()];
        let err = WordVectors::new(vocab, vec![1, 1], usize::MAX, vec![0.0; 2]).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_nan_row_is_backend_error() {
        let vocab = ["main", "broken", "other"].iter().map(|s| s.to_string()).collect();
        let vectors = vec![1.0, 0.0, f32::NAN, 1.0, 0.5, 0.5];
        let space = WordVectors::new(vocab, vec![3, 2, 1], 2, vectors).unwrap();

        let err = space.nearest("main", 5).unwrap_err();
        assert!(matches!(err, LookupError::Backend(ref m) if m.contains("broken")));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let json = serde_json::to_string(&space()).unwrap();
        let back: WordVectors = serde_json::from_str(&json).unwrap();
        assert!(back.contains("init"));
        assert_eq!(back.count("func"), Some(4));
        assert_eq!(back.nearest("main", 1).unwrap()[0].token, "func");
    }
}

// ============================================================
// Layer 3 — Trainer Hyperparameters
// ============================================================
// The recognised options of the hyperparameter boundary:
//
//   vector_size  — length of every word vector            (100)
//   window       — max distance between centre and context (5)
//   min_count    — minimum token frequency to enter vocab  (1)
//   workers      — parallel worker count                   (4)
//   algorithm    — "skip-gram" or "cbow"                   (skip-gram)
//
// #[serde(default)] makes every field optional in a config
// file; serde ignores keys it does not recognise.

use serde::{Deserialize, Serialize};

/// Training algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Predict context tokens from the centre token
    #[default]
    #[serde(rename = "skip-gram", alias = "skipgram", alias = "sg")]
    SkipGram,

    /// Predict the centre token from the averaged context
    #[serde(rename = "cbow")]
    Cbow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    pub vector_size: usize,
    pub window:      usize,
    pub min_count:   usize,
    pub workers:     usize,
    pub algorithm:   Algorithm,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window:      5,
            min_count:   1,
            workers:     4,
            algorithm:   Algorithm::SkipGram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline() {
        let h = Hyperparameters::default();
        assert_eq!(h.vector_size, 100);
        assert_eq!(h.window, 5);
        assert_eq!(h.min_count, 1);
        assert_eq!(h.algorithm, Algorithm::SkipGram);
    }

    #[test]
    fn test_missing_fields_fall_back_and_unknown_are_ignored() {
        let h: Hyperparameters =
            serde_json::from_str(r#"{"window": 8, "algorithm": "cbow", "epochs": 40}"#).unwrap();
        assert_eq!(h.window, 8);
        assert_eq!(h.algorithm, Algorithm::Cbow);
        assert_eq!(h.vector_size, 100);
        assert_eq!(h.workers, 4);
    }

    #[test]
    fn test_algorithm_aliases() {
        let a: Algorithm = serde_json::from_str(r#""sg""#).unwrap();
        assert_eq!(a, Algorithm::SkipGram);
        assert_eq!(serde_json::to_string(&Algorithm::SkipGram).unwrap(), r#""skip-gram""#);
    }
}

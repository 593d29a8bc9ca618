// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the one-shot training job in order:
//
//   Step 1: Open the dataset            (Layer 4 - data)
//   Step 2: Build the token corpus      (Layer 4 - data)
//   Step 3: Train the embedding space   (Layer 5 - ml)
//   Step 4: Persist the model           (Layer 6 - infra)
//   Step 5: Sanity-check a known token  (logging only)
//
// Every failure aborts the run and is reported; nothing is
// retried. There is no incremental retraining: each run trains
// from scratch and overwrites the destination.
//
// Reference: Rust Book §13 (Iterators and Closures)

use std::path::{Path, PathBuf};

use crate::data::{corpus_builder::CorpusBuilder, loader::open_dataset, loader::DEFAULT_TEXT_COLUMN};
use crate::domain::corpus::Corpus;
use crate::domain::error::{Error, Result};
use crate::domain::hyperparameters::Hyperparameters;
use crate::domain::traits::{EmbeddingSpace, EmbeddingTrainer, Neighbor, Persistable};
use crate::infra::model_store::{ModelMetadata, TrainedModel};
use crate::ml::embedding::WordVectors;
use crate::ml::word2vec::Word2VecTrainer;

/// Number of neighbours logged by the sanity check
const SANITY_TOP_K: usize = 5;

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub dataset_path:    PathBuf,
    pub model_path:      PathBuf,
    pub text_column:     String,
    pub hyperparameters: Hyperparameters,
    /// Token whose neighbours are logged after training
    pub sanity_token:    Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:    PathBuf::from("data/train.parquet"),
            model_path:      PathBuf::from("word2vec.model"),
            text_column:     DEFAULT_TEXT_COLUMN.to_string(),
            hyperparameters: Hyperparameters::default(),
            sanity_token:    Some("main".to_string()),
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase<T = Word2VecTrainer> {
    config:  TrainConfig,
    trainer: T,
}

impl TrainUseCase<Word2VecTrainer> {
    pub fn new(config: TrainConfig) -> Self {
        Self { config, trainer: Word2VecTrainer::default() }
    }
}

impl<T: EmbeddingTrainer<Space = WordVectors>> TrainUseCase<T> {
    pub fn with_trainer(config: TrainConfig, trainer: T) -> Self {
        Self { config, trainer }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<ModelMetadata> {
        let cfg = &self.config;

        // ── Step 1 + 2: Load the text column and tokenize it ────────────────
        tracing::info!("Loading dataset from '{}'", cfg.dataset_path.display());
        let source = open_dataset(&cfg.dataset_path)?;

        tracing::info!("Starting text preprocessing...");
        let corpus = CorpusBuilder::with_workers(cfg.hyperparameters.workers)
            .from_source(source.as_ref(), &cfg.text_column)?;
        tracing::info!(
            "Preprocessing complete: {} sequences, {} tokens",
            corpus.len(),
            corpus.token_count()
        );

        // ── Step 3 + 4: Train and persist ───────────────────────────────────
        let model = train_and_persist(&self.trainer, &corpus, &cfg.hyperparameters, &cfg.model_path)?;

        // ── Step 5: Optional sanity check ───────────────────────────────────
        if let Some(token) = &cfg.sanity_token {
            sanity_check(&model.vectors, token);
        }

        Ok(model.metadata)
    }
}

/// Train once over `corpus` and write the result to `destination`.
///
/// Fails with `Error::Training` when the corpus holds no tokens or
/// the trainer fails, and with `Error::Persistence` when the
/// destination cannot be written.
pub fn train_and_persist<T>(
    trainer:         &T,
    corpus:          &Corpus,
    hyperparameters: &Hyperparameters,
    destination:     &Path,
) -> Result<TrainedModel>
where
    T: EmbeddingTrainer<Space = WordVectors>,
{
    if !corpus.has_tokens() {
        return Err(Error::Training(format!(
            "corpus of {} records contains no tokens",
            corpus.len()
        )));
    }

    tracing::info!("Training word2vec model...");
    let vectors = trainer.train(corpus, hyperparameters)?;
    tracing::info!("Model training complete ({} tokens)", vectors.vocabulary_len());

    let metadata = ModelMetadata::new(hyperparameters, corpus, &vectors);
    let model = TrainedModel { metadata, vectors };
    model.save(destination)?;
    tracing::info!("Model successfully saved to: {}", destination.display());

    Ok(model)
}

/// Log the nearest neighbours of `token` if the model knows it.
/// A missing token is a warning, never a failure.
pub fn sanity_check<S: EmbeddingSpace>(space: &S, token: &str) -> Option<Vec<Neighbor>> {
    if !space.contains(token) {
        tracing::warn!("Word '{}' not in vocabulary, could not run similarity check.", token);
        return None;
    }

    match space.nearest(token, SANITY_TOP_K) {
        Ok(neighbors) => {
            let shown: Vec<String> = neighbors
                .iter()
                .map(|n| format!("{} ({:.3})", n.token, n.score))
                .collect();
            tracing::info!(
                "Example: {} most similar words to '{}' are: {}",
                neighbors.len(),
                token,
                shown.join(", ")
            );
            Some(neighbors)
        }
        Err(e) => {
            tracing::warn!("Similarity check for '{}' failed: {}", token, e);
            None
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_params() -> Hyperparameters {
        Hyperparameters { vector_size: 8, window: 2, workers: 2, ..Hyperparameters::default() }
    }

    /// Trainer that always fails, to check error propagation
    struct FailingTrainer;

    impl EmbeddingTrainer for FailingTrainer {
        type Space = WordVectors;

        fn train(&self, _: &Corpus, _: &Hyperparameters) -> Result<WordVectors> {
            Err(Error::Training("trainer exploded".into()))
        }
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            vec!["main".into(), "init_app".into(), "run_loop".into()],
            vec![],
            vec!["init_app".into(), "main".into()],
        ])
    }

    #[test]
    fn test_empty_corpus_is_training_error() {
        let dir  = tempfile::tempdir().unwrap();
        let dest = dir.path().join("m.model");
        let empty = Corpus::new(vec![vec![], vec![]]);
        let err = train_and_persist(&Word2VecTrainer::default(), &empty, &small_params(), &dest)
            .unwrap_err();
        assert!(matches!(err, Error::Training(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn test_trainer_failure_is_reported() {
        let dir  = tempfile::tempdir().unwrap();
        let err = train_and_persist(&FailingTrainer, &corpus(), &small_params(), &dir.path().join("m"))
            .unwrap_err();
        assert!(err.to_string().contains("trainer exploded"));
    }

    #[test]
    fn test_train_and_persist_writes_loadable_model() {
        let dir  = tempfile::tempdir().unwrap();
        let dest = dir.path().join("word2vec.model");
        let model = train_and_persist(&Word2VecTrainer::default(), &corpus(), &small_params(), &dest)
            .unwrap();
        assert_eq!(model.metadata.records, 3);
        assert_eq!(model.metadata.vocabulary, 3);

        let loaded = TrainedModel::load(&dest).unwrap();
        assert_eq!(loaded.vectors.vocabulary(), model.vectors.vocabulary());
    }

    #[test]
    fn test_unwritable_destination_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = train_and_persist(&Word2VecTrainer::default(), &corpus(), &small_params(), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn test_sanity_check() {
        let space = Word2VecTrainer::default().train(&corpus(), &small_params()).unwrap();
        assert_eq!(sanity_check(&space, "main").map(|n| n.len()), Some(2));
        assert!(sanity_check(&space, "absent_token").is_none());
    }

    #[test]
    fn test_execute_end_to_end_from_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("qa.jsonl");
        let mut f = std::fs::File::create(&dataset).unwrap();
        writeln!(f, r#"{{"answer": "Call main() after init_app finishes."}}"#).unwrap();
        writeln!(f, r#"{{"answer": "The user_id was 42"}}"#).unwrap();
        writeln!(f, r#"{{"answer": null}}"#).unwrap();
        writeln!(f, r#"{{"answer": "np.array(h2o) feeds main"}}"#).unwrap();

        let config = TrainConfig {
            dataset_path:    dataset,
            model_path:      dir.path().join("out").join("word2vec.model"),
            hyperparameters: small_params(),
            ..TrainConfig::default()
        };
        let meta = TrainUseCase::new(config.clone()).execute().unwrap();
        assert_eq!(meta.records, 4);

        let model = TrainedModel::load(&config.model_path).unwrap();
        let mut vocab: Vec<&str> = model.vectors.vocabulary().iter().map(String::as_str).collect();
        vocab.sort_unstable();
        assert_eq!(
            vocab,
            vec!["after", "call", "feeds", "finishes", "h2o", "init_app", "main", "np.array", "user_id"]
        );
    }

    #[test]
    fn test_execute_propagates_trainer_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("qa.jsonl");
        std::fs::write(&dataset, "{\"answer\": \"call main after init_app\"}\n").unwrap();

        let config = TrainConfig {
            dataset_path: dataset,
            model_path:   dir.path().join("m.model"),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::with_trainer(config.clone(), FailingTrainer).execute().unwrap_err();
        assert!(matches!(err, Error::Training(ref m) if m == "trainer exploded"));
        assert!(!config.model_path.exists());
    }

    #[test]
    fn test_execute_missing_column_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("qa.jsonl");
        std::fs::write(&dataset, "{\"question\": \"why?\"}\n").unwrap();

        let config = TrainConfig {
            dataset_path: dataset,
            model_path:   dir.path().join("m.model"),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(config).execute().unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }
}

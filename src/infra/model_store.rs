// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores the trained embedding space.
//
// What gets written for a model path `word2vec.model`:
//   1. word2vec.model            — bincode artifact:
//                                  format version + metadata + vectors
//   2. word2vec.model.meta.json  — the same metadata as pretty JSON,
//                                  for humans and deploy scripts
//
// Writes go to `<path>.tmp` first and are renamed into place,
// so a crash mid-write never leaves a truncated model behind.
//
// Loading checks the format version and rebuilds the lookup
// index; a matrix whose shape disagrees with its vocabulary is
// rejected as corrupt.
//
// Every failure is reported as Error::Persistence with the path.
//
// Reference: Rust Book §9 (Error Handling)
//            bincode crate documentation

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::corpus::Corpus;
use crate::domain::error::{Error, Result};
use crate::domain::hyperparameters::Hyperparameters;
use crate::domain::traits::{EmbeddingSpace, Persistable};
use crate::ml::embedding::WordVectors;

/// Bumped whenever the artifact layout changes
pub const FORMAT_VERSION: u32 = 1;

/// Provenance stored alongside the vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Version of this crate that trained the model
    pub version:         String,
    /// RFC 3339 timestamp of training
    pub created_at:      String,
    pub hyperparameters: Hyperparameters,
    /// Number of dataset records the corpus was built from
    pub records:         usize,
    /// Number of tokens in the corpus
    pub tokens:          usize,
    /// Number of distinct tokens in the trained vocabulary
    pub vocabulary:      usize,
}

impl ModelMetadata {
    pub fn new(hyperparameters: &Hyperparameters, corpus: &Corpus, space: &WordVectors) -> Self {
        Self {
            version:         env!("CARGO_PKG_VERSION").to_string(),
            created_at:      chrono::Utc::now().to_rfc3339(),
            hyperparameters: hyperparameters.clone(),
            records:         corpus.len(),
            tokens:          corpus.token_count(),
            vocabulary:      space.vocabulary_len(),
        }
    }
}

/// A trained model as it lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub metadata: ModelMetadata,
    pub vectors:  WordVectors,
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    format_version: u32,
    model:          &'a TrainedModel,
}

#[derive(Deserialize)]
struct Artifact {
    format_version: u32,
    model:          TrainedModel,
}

/// `<path>.meta.json`
pub fn metadata_path(path: &Path) -> PathBuf {
    with_suffix(path, ".meta.json")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

impl Persistable for TrainedModel {
    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::persistence(path, e))?;
        }

        // Write the artifact next to its destination, then rename
        let tmp = with_suffix(path, ".tmp");
        let write = || -> std::result::Result<(), String> {
            let file = File::create(&tmp).map_err(|e| e.to_string())?;
            let mut writer = BufWriter::new(file);
            let artifact = ArtifactRef { format_version: FORMAT_VERSION, model: self };
            bincode::serialize_into(&mut writer, &artifact).map_err(|e| e.to_string())?;
            writer.flush().map_err(|e| e.to_string())?;
            fs::rename(&tmp, path).map_err(|e| e.to_string())
        };
        if let Err(reason) = write() {
            fs::remove_file(&tmp).ok();
            return Err(Error::persistence(path, reason));
        }

        let meta_path = metadata_path(path);
        let json = serde_json::to_string_pretty(&self.metadata)
            .map_err(|e| Error::persistence(&meta_path, e))?;
        fs::write(&meta_path, json).map_err(|e| Error::persistence(&meta_path, e))?;

        tracing::debug!(
            "Saved model ({} tokens, dim {}) to '{}'",
            self.vectors.vocabulary_len(),
            self.vectors.dim(),
            path.display()
        );
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            Error::persistence(path, format!("{e}. Have you run 'train' first?"))
        })?;

        // Slice decoding bounds every length prefix by the bytes actually present
        let artifact: Artifact = bincode::deserialize(&bytes)
            .map_err(|e| Error::persistence(path, format!("corrupt model artifact: {e}")))?;

        if artifact.format_version != FORMAT_VERSION {
            return Err(Error::persistence(
                path,
                format!(
                    "unsupported format version {} (expected {})",
                    artifact.format_version, FORMAT_VERSION
                ),
            ));
        }

        tracing::info!(
            "Loaded model from '{}': {} tokens, dim {}, trained {}",
            path.display(),
            artifact.model.vectors.vocabulary_len(),
            artifact.model.vectors.dim(),
            artifact.model.metadata.created_at
        );
        Ok(artifact.model)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TrainedModel {
        let vectors = WordVectors::new(
            vec!["main".into(), "init_app".into()],
            vec![2, 1],
            2,
            vec![1.0, 0.0, 0.5, 0.5],
        )
        .unwrap();
        let corpus = Corpus::new(vec![vec!["main".into(), "init_app".into(), "main".into()]]);
        let metadata = ModelMetadata::new(&Hyperparameters::default(), &corpus, &vectors);
        TrainedModel { metadata, vectors }
    }

    #[test]
    fn test_save_then_load() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("word2vec.model");

        let saved = model();
        saved.save(&path).unwrap();
        assert!(metadata_path(&path).exists());
        assert!(!with_suffix(&path, ".tmp").exists());

        let loaded = TrainedModel::load(&path).unwrap();
        assert_eq!(loaded.metadata, saved.metadata);
        assert_eq!(loaded.metadata.tokens, 3);
        assert_eq!(loaded.metadata.vocabulary, 2);
        assert_eq!(loaded.vectors.vector("init_app"), Some(&[0.5f32, 0.5][..]));
        assert!(loaded.vectors.contains("main"));
    }

    #[test]
    fn test_sidecar_is_json() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.model");
        model().save(&path).unwrap();

        let json = fs::read_to_string(metadata_path(&path)).unwrap();
        let meta: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta.hyperparameters.vector_size, 100);
    }

    #[test]
    fn test_missing_file() {
        let err = TrainedModel::load(Path::new("/no/such/model")).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert!(err.to_string().contains("/no/such/model"));
    }

    #[test]
    fn test_garbage_file_is_persistence_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.model");
        fs::write(&path, b"definitely not a model").unwrap();
        let err = TrainedModel::load(&path).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir  = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by the model file
        let err = model().save(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }
}

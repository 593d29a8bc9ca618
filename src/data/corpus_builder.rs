// ============================================================
// Layer 4 — Corpus Builder
// ============================================================
// Applies the tokenizer to every record of the dataset's text
// column, producing one token sequence per record.
//
// Records are independent and the tokenizer is pure, so the
// work is a plain parallel map (rayon). `collect()` on an
// indexed parallel iterator keeps input order, so sequence i
// always comes from record i.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            rayon crate documentation

use rayon::prelude::*;

use crate::data::tokenizer::tokenize_record;
use crate::domain::corpus::Corpus;
use crate::domain::error::{Error, Result};
use crate::domain::record::RawRecord;
use crate::domain::traits::DatasetSource;

pub struct CorpusBuilder {
    /// Thread pool size; `None` uses rayon's global pool
    workers: Option<usize>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self { workers: None }
    }

    /// Run tokenization on a dedicated pool of `workers` threads.
    pub fn with_workers(workers: usize) -> Self {
        Self { workers: Some(workers.max(1)) }
    }

    /// Tokenize every record, order preserving. Never fails:
    /// records that yield nothing become empty sequences.
    pub fn build(&self, records: &[RawRecord]) -> Result<Corpus> {
        let run = || Corpus::new(records.par_iter().map(tokenize_record).collect());

        let corpus = match self.workers {
            None => run(),
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| Error::Internal(format!("cannot start tokenizer pool: {e}")))?
                .install(run),
        };

        tracing::debug!(
            "Tokenized {} records into {} tokens",
            corpus.len(),
            corpus.token_count()
        );
        Ok(corpus)
    }

    /// Load `column` from a dataset and tokenize it.
    ///
    /// The source checks that the column exists before returning
    /// any record, so a missing column fails as `Error::Schema`
    /// without any tokenization work.
    pub fn from_source(&self, source: &dyn DatasetSource, column: &str) -> Result<Corpus> {
        let records = source.load_column(column)?;
        tracing::info!("Loaded {} records from column '{}'", records.len(), column);
        self.build(&records)
    }
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

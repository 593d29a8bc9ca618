// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a dataset file to the token corpus the
// trainer consumes:
//
//   .parquet / .jsonl file
//       │
//       ▼
//   ParquetLoader / JsonLinesLoader  → one RawRecord per row
//       │
//       ▼
//   CorpusBuilder                    → tokenizes every record
//       │                              (parallel, order kept)
//       ▼
//   tokenizer::tokenize              → code-aware tokens
//       │
//       ▼
//   Corpus                           → handed to Layer 5
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads the text column from parquet or JSON Lines files
pub mod loader;

/// Code-aware tokenizer and its fixed word lists
pub mod tokenizer;

/// Applies the tokenizer to every record
pub mod corpus_builder;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define what the
// system works with:
//
//   RawRecord        → one text cell from the dataset
//   Corpus           → token sequences fed to the trainer
//   Hyperparameters  → trainer settings
//   Error            → the error taxonomy shared by every layer
//   traits           → the capability seams (dataset, trainer,
//                      embedding space, persistence)
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO training maths
//   - Only plain data and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// A single raw text record from the dataset
pub mod record;

/// Token sequences and the training corpus
pub mod corpus;

/// Trainer hyperparameters and their baseline values
pub mod hyperparameters;

/// Error taxonomy
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;

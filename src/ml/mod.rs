// ============================================================
// Layer 5 — ML / Embedding Layer
// ============================================================
// Everything that knows what a word vector is lives here.
// No other layer does vector maths.
//
//   word2vec.rs  — The trainer collaborator
//                  Builds the vocabulary and runs skip-gram or
//                  CBOW with negative sampling over the corpus
//
//   embedding.rs — The trained embedding space
//                  Vocabulary + vectors, cosine nearest-neighbour
//                  queries, serde support for persistence
//
// Both sit behind the Layer 3 traits (EmbeddingTrainer,
// EmbeddingSpace), so the application layer can be tested
// against an in-memory fake instead of real training.
//
// Reference: Mikolov et al. (2013) word2vec

/// Trained word vectors and nearest-neighbour lookup
pub mod embedding;

/// Skip-gram / CBOW trainer with negative sampling
pub mod word2vec;

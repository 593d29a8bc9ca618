// ============================================================
// Layer 5 — Word2Vec Trainer (skip-gram / CBOW, negative sampling)
// ============================================================
// The embedding-training collaborator behind EmbeddingTrainer.
// One pass builds the vocabulary, then a few epochs of plain
// SGD run over the corpus.
//
// Two weight matrices, both vocab_len x dim, row-major:
//   syn0 — input vectors  (these become the word vectors)
//   syn1 — output vectors (only used during training)
//
// For every centre token and every context token inside a
// randomly shrunk window:
//
//   skip-gram:  input = syn0[centre],          target = context
//   cbow:       input = mean(syn0[contexts]),  target = centre
//
// Negative sampling update for one (input h, target t):
//   for (w, label) in [(t, 1)] + NEGATIVE draws of (noise, 0):
//       g      = (label - σ(h · syn1[w])) * α
//       grad  += g * syn1[w]
//       syn1[w] += g * h
//   syn0[input rows] += grad
//
// Noise words are drawn from the unigram distribution raised to
// the 3/4 power; α decays linearly from ALPHA to MIN_ALPHA over
// the whole run. A fixed seed makes training reproducible.
//
// Reference: Mikolov et al. (2013) Distributed Representations
//            of Words and Phrases and their Compositionality

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::corpus::Corpus;
use crate::domain::error::{Error, Result};
use crate::domain::hyperparameters::{Algorithm, Hyperparameters};
use crate::domain::traits::EmbeddingTrainer;
use crate::ml::embedding::WordVectors;

/// σ(x) is treated as 0 or 1 beyond this magnitude
const MAX_EXP: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct Word2VecTrainer {
    pub epochs:    usize,
    pub negative:  usize,
    pub alpha:     f32,
    pub min_alpha: f32,
    pub seed:      u64,
}

impl Default for Word2VecTrainer {
    fn default() -> Self {
        Self {
            epochs:    5,
            negative:  5,
            alpha:     0.025,
            min_alpha: 0.0001,
            seed:      1,
        }
    }
}

impl EmbeddingTrainer for Word2VecTrainer {
    type Space = WordVectors;

    fn train(&self, corpus: &Corpus, params: &Hyperparameters) -> Result<WordVectors> {
        if params.vector_size == 0 {
            return Err(Error::Training("vector_size must be positive".into()));
        }
        if params.window == 0 {
            return Err(Error::Training("window must be positive".into()));
        }
        if self.epochs == 0 {
            return Err(Error::Training("epochs must be positive".into()));
        }

        let vocab = Vocabulary::build(corpus, params.min_count.max(1));
        if vocab.is_empty() {
            return Err(Error::Training(format!(
                "no token reaches min_count={} in {} sequences",
                params.min_count,
                corpus.len()
            )));
        }

        let sentences = vocab.encode(corpus);
        let dim = params.vector_size;
        let mut rng = StdRng::seed_from_u64(self.seed);

        tracing::info!(
            "Training {:?}: {} tokens in vocabulary, {} words, dim={}, window={}, epochs={}",
            params.algorithm,
            vocab.len(),
            vocab.total_words(),
            dim,
            params.window,
            self.epochs,
        );

        // Input vectors start small and random, output vectors at zero
        let mut syn0: Vec<f32> = (0..vocab.len() * dim)
            .map(|_| (rng.gen::<f32>() - 0.5) / dim as f32)
            .collect();
        let mut syn1 = vec![0.0f32; vocab.len() * dim];

        let noise = NoiseTable::new(&vocab.counts);
        let mut state = StepState {
            dim,
            negative: self.negative,
            grad: vec![0.0; dim],
            hidden: vec![0.0; dim],
        };

        let total_words = (vocab.total_words() * self.epochs as u64).max(1);
        let mut processed = 0u64;

        for epoch in 1..=self.epochs {
            let mut loss  = 0.0f64;
            let mut pairs = 0u64;

            for sentence in &sentences {
                let progress = processed as f32 / total_words as f32;
                let alpha = (self.alpha - (self.alpha - self.min_alpha) * progress).max(self.min_alpha);

                for pos in 0..sentence.len() {
                    // Shrink the window at random, as word2vec does
                    let reduced = params.window - rng.gen_range(0..params.window);
                    let start   = pos.saturating_sub(reduced);
                    let end     = (pos + reduced + 1).min(sentence.len());
                    let centre  = sentence[pos];
                    let contexts = (start..end).filter(|&c| c != pos).map(|c| sentence[c]);

                    match params.algorithm {
                        Algorithm::SkipGram => {
                            for context in contexts {
                                let row = centre * dim..(centre + 1) * dim;
                                state.hidden.copy_from_slice(&syn0[row.clone()]);
                                loss += state.step(&mut syn1, context, &noise, &mut rng, alpha);
                                for (w, g) in syn0[row].iter_mut().zip(&state.grad) {
                                    *w += g;
                                }
                                pairs += 1;
                            }
                        }
                        Algorithm::Cbow => {
                            let contexts: Vec<usize> = contexts.collect();
                            if contexts.is_empty() {
                                continue;
                            }
                            state.hidden.fill(0.0);
                            for &c in &contexts {
                                for (h, w) in state.hidden.iter_mut().zip(&syn0[c * dim..(c + 1) * dim]) {
                                    *h += w;
                                }
                            }
                            let scale = 1.0 / contexts.len() as f32;
                            state.hidden.iter_mut().for_each(|h| *h *= scale);

                            loss += state.step(&mut syn1, centre, &noise, &mut rng, alpha);
                            for &c in &contexts {
                                for (w, g) in syn0[c * dim..(c + 1) * dim].iter_mut().zip(&state.grad) {
                                    *w += g;
                                }
                            }
                            pairs += 1;
                        }
                    }
                }
                processed += sentence.len() as u64;
            }

            let mean_loss = if pairs == 0 { 0.0 } else { loss / pairs as f64 };
            tracing::info!("Epoch {}/{}: mean loss {:.4} over {} pairs", epoch, self.epochs, mean_loss, pairs);
        }

        WordVectors::new(vocab.tokens, vocab.counts, dim, syn0).map_err(Error::Training)
    }
}

// ─── Vocabulary ──────────────────────────────────────────────────────────────

struct Vocabulary {
    tokens: Vec<String>,
    counts: Vec<u64>,
    index:  HashMap<String, usize>,
}

impl Vocabulary {
    /// Count tokens, keep those seen at least `min_count` times,
    /// order by count descending with ties in first-seen order.
    fn build(corpus: &Corpus, min_count: usize) -> Self {
        let mut first_seen: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for token in corpus.iter().flatten() {
            let c = counts.entry(token.as_str()).or_insert(0);
            if *c == 0 {
                first_seen.push(token.as_str());
            }
            *c += 1;
        }

        let mut kept: Vec<(&str, u64)> = first_seen
            .into_iter()
            .map(|t| (t, counts[t]))
            .filter(|&(_, c)| c >= min_count as u64)
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1));

        let tokens: Vec<String> = kept.iter().map(|(t, _)| t.to_string()).collect();
        let index = tokens.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        Self {
            tokens,
            counts: kept.into_iter().map(|(_, c)| c).collect(),
            index,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn total_words(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Map sequences to vocabulary ids, dropping tokens below min_count
    fn encode(&self, corpus: &Corpus) -> Vec<Vec<usize>> {
        corpus
            .iter()
            .map(|seq| seq.iter().filter_map(|t| self.index.get(t).copied()).collect())
            .filter(|ids: &Vec<usize>| !ids.is_empty())
            .collect()
    }
}

// ─── Negative sampling ───────────────────────────────────────────────────────

/// Cumulative unigram^0.75 distribution, sampled by binary search.
struct NoiseTable {
    cumulative: Vec<f64>,
}

impl NoiseTable {
    fn new(counts: &[u64]) -> Self {
        let mut total = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                total += (c as f64).powf(0.75);
                total
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.gen::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

/// Scratch buffers reused across every update.
struct StepState {
    dim:      usize,
    negative: usize,
    /// Accumulated gradient for the input vector(s)
    grad:     Vec<f32>,
    /// The input vector h
    hidden:   Vec<f32>,
}

impl StepState {
    /// One positive and `negative` noise updates; returns the loss.
    fn step(
        &mut self,
        syn1:   &mut [f32],
        target: usize,
        noise:  &NoiseTable,
        rng:    &mut StdRng,
        alpha:  f32,
    ) -> f64 {
        self.grad.fill(0.0);
        let mut loss = 0.0f64;

        for d in 0..=self.negative {
            let (word, label) = if d == 0 {
                (target, 1.0f32)
            } else {
                let w = noise.sample(rng);
                if w == target {
                    continue;
                }
                (w, 0.0f32)
            };

            let row = &mut syn1[word * self.dim..(word + 1) * self.dim];
            let f: f32 = self.hidden.iter().zip(row.iter()).map(|(a, b)| a * b).sum();
            let sig = sigmoid(f);
            let g = (label - sig) * alpha;

            let p = if label > 0.5 { sig } else { 1.0 - sig };
            loss -= (p.max(1e-7) as f64).ln();

            for i in 0..self.dim {
                self.grad[i] += g * row[i];
                row[i] += g * self.hidden[i];
            }
        }

        loss
    }
}

fn sigmoid(x: f32) -> f32 {
    if x > MAX_EXP {
        1.0
    } else if x < -MAX_EXP {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::EmbeddingSpace;

    fn corpus(rows: &[&str]) -> Corpus {
        Corpus::new(
            rows.iter()
                .map(|r| r.split_whitespace().map(str::to_string).collect())
                .collect(),
        )
    }

    fn small_params(algorithm: Algorithm) -> Hyperparameters {
        Hyperparameters { vector_size: 16, window: 2, algorithm, ..Hyperparameters::default() }
    }

    #[test]
    fn test_vocabulary_order_and_min_count() {
        let c = corpus(&["beta alpha beta", "gamma alpha beta", "delta"]);
        let v = Vocabulary::build(&c, 1);
        assert_eq!(v.tokens, vec!["beta", "alpha", "gamma", "delta"]);
        assert_eq!(v.counts, vec![3, 2, 1, 1]);

        let v = Vocabulary::build(&c, 2);
        assert_eq!(v.tokens, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_vocabulary_is_exactly_the_corpus_tokens() {
        let c = corpus(&["user_id np.array main", "", "main h2o"]);
        let space = Word2VecTrainer::default().train(&c, &small_params(Algorithm::SkipGram)).unwrap();
        let mut vocab: Vec<&str> = space.vocabulary().iter().map(String::as_str).collect();
        vocab.sort_unstable();
        assert_eq!(vocab, vec!["h2o", "main", "np.array", "user_id"]);
        assert_eq!(space.dim(), 16);
    }

    #[test]
    fn test_training_is_reproducible() {
        let c = corpus(&["main calls init_app then run_loop", "init_app reads config_path"]);
        let params = small_params(Algorithm::SkipGram);
        let a = Word2VecTrainer::default().train(&c, &params).unwrap();
        let b = Word2VecTrainer::default().train(&c, &params).unwrap();
        assert_eq!(a.vector("main"), b.vector("main"));
    }

    #[test]
    fn test_cbow_trains() {
        let c = corpus(&["main calls init_app then run_loop", "init_app reads config_path"]);
        let space = Word2VecTrainer::default().train(&c, &small_params(Algorithm::Cbow)).unwrap();
        assert_eq!(space.vocabulary_len(), 7);
        let n = space.nearest("main", 3).unwrap();
        assert_eq!(n.len(), 3);
        assert!(n.iter().all(|n| n.score.is_finite()));
    }

    #[test]
    fn test_empty_corpus_fails() {
        let err = Word2VecTrainer::default()
            .train(&corpus(&["", ""]), &Hyperparameters::default())
            .unwrap_err();
        assert!(matches!(err, Error::Training(_)));
    }

    #[test]
    fn test_zero_vector_size_fails() {
        let params = Hyperparameters { vector_size: 0, ..Hyperparameters::default() };
        let err = Word2VecTrainer::default().train(&corpus(&["main"]), &params).unwrap_err();
        assert!(matches!(err, Error::Training(_)));
    }

    #[test]
    fn test_noise_table_respects_bounds() {
        let table = NoiseTable::new(&[10, 1, 1]);
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<usize> = (0..1000).map(|_| table.sample(&mut rng)).collect();
        assert!(draws.iter().all(|&d| d < 3));
        // the frequent token dominates
        assert!(draws.iter().filter(|&&d| d == 0).count() > 500);
    }
}

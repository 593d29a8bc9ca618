// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `similar` and `serve`
// and all their configurable flags.
//
// Hyperparameters come from an optional JSON file (--config);
// --workers overrides whatever the file says.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::similar_use_case::DEFAULT_TOP_K;
use crate::application::train_use_case::TrainConfig;
use crate::data::loader::DEFAULT_TEXT_COLUMN;
use crate::infra::config::load_hyperparameters;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a token corpus from a dataset and train word vectors on it
    Train(TrainArgs),

    /// Print the nearest neighbours of one word
    Similar(SimilarArgs),

    /// Serve similarity queries over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Parquet or JSON Lines file holding the text column
    #[arg(long)]
    pub dataset_path: PathBuf,

    /// Where the trained model is written (overwritten if present)
    #[arg(long, default_value = "word2vec.model")]
    pub model_path: PathBuf,

    /// Column that holds the free text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    pub text_column: String,

    /// JSON file with trainer hyperparameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads for preprocessing
    #[arg(long)]
    pub workers: Option<usize>,

    /// Token whose neighbours are logged after training
    #[arg(long, default_value = "main")]
    pub sanity_token: String,

    /// Skip the post-training similarity check
    #[arg(long, conflicts_with = "sanity_token")]
    pub no_sanity_check: bool,
}

/// The application layer never sees clap types; loading the config
/// file can fail, hence TryFrom.
impl TryFrom<TrainArgs> for TrainConfig {
    type Error = anyhow::Error;

    fn try_from(a: TrainArgs) -> anyhow::Result<Self> {
        let mut hyperparameters = load_hyperparameters(a.config.as_deref())?;
        if let Some(workers) = a.workers {
            hyperparameters.workers = workers;
        }

        Ok(TrainConfig {
            dataset_path: a.dataset_path,
            model_path: a.model_path,
            text_column: a.text_column,
            hyperparameters,
            sanity_token: (!a.no_sanity_check).then_some(a.sanity_token),
        })
    }
}

#[derive(Args, Debug)]
pub struct SimilarArgs {
    /// Trained model file
    #[arg(long, default_value = "word2vec.model")]
    pub model_path: PathBuf,

    /// Word to look up
    #[arg(long)]
    pub word: String,

    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Trained model file, loaded once at startup
    #[arg(long, default_value = "word2vec.model")]
    pub model_path: PathBuf,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`   — builds the corpus, trains and saves the model
//   2. `similar` — loads the model and prints one query's answer
//   3. `serve`   — loads the model and answers queries over HTTP
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, ServeArgs, SimilarArgs, TrainArgs};

use crate::application::similar_use_case::SimilarityService;
use crate::application::train_use_case::{TrainConfig, TrainUseCase};

#[derive(Parser, Debug)]
#[command(
    name = "word-similarity",
    version,
    about = "Train code-aware word vectors on a text dataset, then query for similar words."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Similar(args) => run_similar(args),
            Commands::Serve(args)   => run_serve(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let config = TrainConfig::try_from(args)?;
    tracing::info!("Starting training on dataset: {}", config.dataset_path.display());

    let metadata = TrainUseCase::new(config.clone()).execute()?;

    println!(
        "Training complete: {} tokens in vocabulary, model saved to {}",
        metadata.vocabulary,
        config.model_path.display()
    );
    Ok(())
}

fn run_similar(args: SimilarArgs) -> Result<()> {
    let service = SimilarityService::load(&args.model_path)?;
    let neighbors = service.find_similar(&args.word, args.top_k)?;

    if neighbors.is_empty() {
        println!("No neighbours for '{}'", args.word.trim());
    }
    for n in neighbors {
        println!("{:<32} {:.4}", n.token, n.score);
    }
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Loading model from {}", args.model_path.display());
    let service = SimilarityService::load(&args.model_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start async runtime")?;
    runtime.block_on(crate::server::serve(service, args.addr()))
}

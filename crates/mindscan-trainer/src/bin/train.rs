//! Mindscan training CLI
//!
//! Trains, evaluates and spot-checks the concern recognizer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mindscan_core::{CategoryTable, ConcernAnalyzer, ConcernRecognizer, SequenceLabeler};
use mindscan_trainer::{TrainingConfig, evaluate_model, run_training};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_TEXT: &str = "Lately, I've been feeling very stressed and anxious.";

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train and evaluate the mental-health concern recognizer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Labeled CSV with `User Input` and `Extracted Concern` columns
    #[arg(
        short,
        long,
        env = "MINDSCAN_DATASET",
        default_value = "data/mental_health.csv"
    )]
    dataset: PathBuf,

    /// Where the model is written to and read from
    #[arg(
        short,
        long,
        env = "MINDSCAN_MODEL",
        default_value = "models/mental_health_ner.json"
    )]
    model: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a fresh model on the dataset and save it
    Train {
        /// Passes over the training set
        #[arg(short, long, default_value_t = 30)]
        epochs: usize,
        /// Feature dropout rate during updates
        #[arg(long, default_value_t = 0.3)]
        dropout: f32,
        /// Seed for shuffling and dropout
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Score the saved model on the dataset afterwards
        #[arg(long)]
        evaluate: bool,
    },
    /// Report precision, recall and F1 of the saved model on the dataset
    Evaluate,
    /// Run the saved model over a sentence and print what it finds
    Detect {
        /// Sentence to analyze
        #[arg(default_value = SAMPLE_TEXT)]
        text: String,
        /// JSON category table replacing the built-in one
        #[arg(short, long, env = "MINDSCAN_TABLE")]
        table: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        dataset,
        model,
    } = cli;

    match command {
        Commands::Train {
            epochs,
            dropout,
            seed,
            evaluate,
        } => {
            let config = TrainingConfig::new()
                .with_epochs(epochs)
                .with_dropout(dropout)
                .with_seed(seed);
            let trained = run_training(&dataset, &model, config)?;
            info!(
                path = %model.display(),
                examples = trained.examples,
                "model training complete"
            );

            if evaluate {
                print_report(&model, &dataset)?;
            }
        }
        Commands::Evaluate => print_report(&model, &dataset)?,
        Commands::Detect { text, table } => {
            let table = match table {
                Some(path) => CategoryTable::from_json_file(&path)
                    .with_context(|| format!("Failed to load table: {}", path.display()))?,
                None => CategoryTable::default(),
            };
            let recognizer = ConcernRecognizer::load(&model)
                .with_context(|| format!("Failed to load model: {}", model.display()))?;
            let label = recognizer.label().to_string();
            let analyzer = ConcernAnalyzer::new(Arc::new(recognizer), table);

            let results = analyzer.analyze(&text)?;
            println!("Detected mental health concerns:");
            if results.is_empty() {
                println!("  (none)");
            }
            for result in results {
                println!(
                    "  Concern: {} (Label: {}) -> {}, intensity {}",
                    result.phrase, label, result.category, result.intensity
                );
            }
        }
    }

    Ok(())
}

fn print_report(model: &Path, dataset: &Path) -> Result<()> {
    let report = evaluate_model(model, dataset)?;
    println!("Model evaluation ({} examples):", report.examples);
    println!("{report}");
    Ok(())
}

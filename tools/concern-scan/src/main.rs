//! Reads one text per line from stdin and prints one JSON analysis per line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mindscan_core::{
    CategoryTable, ConcernAnalyzer, ConcernRecognizer, ConcernResult, SequenceLabeler,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "concern-scan")]
#[command(about = "Analyze stdin lines for mental-health concerns, one JSON object per line")]
#[command(version)]
struct Cli {
    /// Trained concern model
    #[arg(
        short,
        long,
        env = "MINDSCAN_MODEL",
        default_value = "models/mental_health_ner.json"
    )]
    model: PathBuf,

    /// JSON category table replacing the built-in one
    #[arg(short, long, env = "MINDSCAN_TABLE")]
    table: Option<PathBuf>,
}

/// One line of output.
#[derive(Debug, Serialize)]
struct ScanOutput {
    input: String,
    concerns: Vec<ConcernResult>,
    error: Option<String>,
}

fn scan_line<L: SequenceLabeler + ?Sized>(analyzer: &ConcernAnalyzer<L>, line: &str) -> ScanOutput {
    match analyzer.analyze(line) {
        Ok(concerns) => ScanOutput {
            input: line.to_string(),
            concerns,
            error: None,
        },
        Err(e) => ScanOutput {
            input: line.to_string(),
            concerns: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let table = match &cli.table {
        Some(path) => CategoryTable::from_json_file(path)
            .with_context(|| format!("Failed to load table: {}", path.display()))?,
        None => CategoryTable::default(),
    };
    let recognizer = ConcernRecognizer::load(&cli.model)
        .with_context(|| format!("Failed to load model: {}", cli.model.display()))?;
    let analyzer = ConcernAnalyzer::new(Arc::new(recognizer), table);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut scanned = 0usize;

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = scan_line(&analyzer, line);
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
        scanned += 1;
    }

    info!(scanned, "done");
    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use spendcat::{
    ClassificationReport, Classifier, SpendcatConfig, TransactionRecord, classify_transactions,
    embed_missing, embedder_from_config, parse_statement, reference_set,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spendcat")]
#[command(about = "Categorise bank transactions by nearest-neighbour vote")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify pending transactions against already-categorised ones.
    Classify {
        /// JSON file: {"classified": [...], "pending": [...]}
        #[arg(long)]
        input: PathBuf,
    },
    /// Parse document-understanding output into transaction records.
    ParseStatement {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct ClassifyInput {
    #[serde(default)]
    classified: Vec<TransactionRecord>,
    #[serde(default)]
    pending: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    reports: Vec<ClassificationReport>,
    transactions: Vec<TransactionRecord>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SpendcatConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SpendcatConfig::default(),
    };
    init_tracing(&config);

    match cli.cmd {
        Command::Classify { input } => classify(&config, &input).await,
        Command::ParseStatement { input } => parse(&config, &input),
    }
}

fn init_tracing(config: &SpendcatConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn classify(config: &SpendcatConfig, input: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let ClassifyInput {
        mut classified,
        mut pending,
    } = serde_json::from_str(&raw).context("parsing classify input")?;

    let embedder = embedder_from_config(&config.to_semantic_config())?;
    embed_missing(embedder.as_ref(), &mut classified).await?;
    embed_missing(embedder.as_ref(), &mut pending).await?;

    let references = reference_set(&classified);
    let classifier = Classifier::new(config.to_classifier_config())?;
    let reports = classify_transactions(&classifier, &mut pending, &references)?;

    let accepted = reports.iter().filter(|r| r.decision.accepted).count();
    info!(
        pending = reports.len(),
        accepted,
        abstained = reports.len() - accepted,
        "classify_complete"
    );

    let output = ClassifyOutput {
        reports,
        transactions: pending,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse(config: &SpendcatConfig, input: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let records = parse_statement(&raw, &config.to_ingest_config()?)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

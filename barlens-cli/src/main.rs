//! BarLens CLI — chart annotation and question answering over a bar CSV.
//!
//! Commands:
//! - `annotate` — normalize a CSV and print the chart annotation model as JSON
//! - `ask` — answer a question about a CSV, deterministically or via the LLM

mod loader;

use anyhow::{Context, Result};
use barlens_core::annotate::{BandSeries, MarkerSeries};
use barlens_core::query::Delegate;
use barlens_core::{
    build, normalize, BarlensConfig, ChartAnnotationModel, IngestWarning, LlmDelegate, Normalized,
    Query, QueryDispatcher,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "barlens",
    about = "BarLens CLI — signal annotations and Q&A over daily price bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the chart annotation model for a CSV and print it as JSON.
    Annotate {
        /// Bar CSV with timestamp/date, open, high, low, close columns.
        csv: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of most recent bars to include. Overrides `annotate.window`.
        #[arg(long, conflicts_with = "all")]
        window: Option<usize>,

        /// Include every bar instead of the display window.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Answer a question about the bars in a CSV.
    Ask {
        /// Bar CSV with timestamp/date, open, high, low, close columns.
        csv: PathBuf,

        /// The question, e.g. "How many days were bullish?".
        question: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// JSON document printed by `annotate`.
#[derive(Serialize)]
struct AnnotateOutput<'a> {
    bars: &'a ChartAnnotationModel,
    markers: Vec<MarkerSeries>,
    bands: BandSeries,
    warnings: &'a [IngestWarning],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate {
            csv,
            config,
            window,
            all,
            pretty,
        } => run_annotate(&csv, config.as_deref(), window, all, pretty),
        Commands::Ask {
            csv,
            question,
            config,
        } => run_ask(&csv, &question, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<BarlensConfig> {
    match path {
        Some(path) => Ok(BarlensConfig::from_file(path)?),
        None => Ok(BarlensConfig::default()),
    }
}

fn load_bars(csv: &Path) -> Result<Normalized> {
    let file = File::open(csv).with_context(|| format!("open {}", csv.display()))?;
    let rows = loader::load_rows(BufReader::new(file))
        .with_context(|| format!("load {}", csv.display()))?;
    let normalized = normalize(&rows);
    info!(
        rows = rows.len(),
        bars = normalized.bars.len(),
        dropped = normalized.dropped_rows(),
        warnings = normalized.warnings.len(),
        "loaded {}",
        csv.display()
    );
    Ok(normalized)
}

fn run_annotate(
    csv: &Path,
    config_path: Option<&Path>,
    window: Option<usize>,
    all: bool,
    pretty: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let policy = config.annotate.marker_policy()?;
    let normalized = load_bars(csv)?;

    let full = build(&normalized.bars, &policy);
    let model = if all {
        full
    } else {
        full.tail(window.unwrap_or(config.annotate.window))
    };

    let output = AnnotateOutput {
        bars: &model,
        markers: model.marker_series(),
        bands: model.band_series(),
        warnings: &normalized.warnings,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

fn run_ask(csv: &Path, question: &str, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let normalized = load_bars(csv)?;

    let delegate = LlmDelegate::from_config(&config.delegate);
    if !delegate.has_credential() {
        info!(
            env_var = %config.delegate.api_key_env,
            "no LLM credential; only deterministic questions can be answered"
        );
    }
    let delegate: Box<dyn Delegate> = Box::new(delegate);
    let dispatcher = QueryDispatcher::new(delegate).with_symbol(config.delegate.symbol.clone());

    let answer = dispatcher.answer(&Query::new(question, &normalized.bars));
    println!("[{}] {}", answer.source, answer.text);
    Ok(())
}

//! walletscore — Credit scores for lending-protocol wallets.
//!
//! Reads a JSON export of protocol events, scores every wallet in
//! `[0, 1000]`, and writes a scores CSV plus a distribution chart.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use walletscore_core::types::Feature;
use walletscore_pipeline::{Pipeline, PipelineConfig, Strategy};

/// Wallet credit scoring from lending-protocol event logs.
#[derive(Parser, Debug)]
#[command(name = "walletscore", version, about)]
struct Cli {
    /// TOML configuration file (default: ./walletscore.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json").
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every wallet and write the CSV and histogram.
    Score(ScoreArgs),
    /// Write the aggregated feature table with heuristic pseudo-scores.
    Features(FeaturesArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON export of protocol events.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Scores CSV path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Histogram SVG path.
    #[arg(short, long)]
    plot: Option<PathBuf>,

    /// Scoring strategy ("model" or "baseline").
    #[arg(long)]
    strategy: Option<String>,

    /// Seed for the train/test split and row subsampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Model input columns (comma-separated).
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,
}

#[derive(Args, Debug)]
struct FeaturesArgs {
    /// JSON export of protocol events.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Feature table CSV path.
    #[arg(short, long, default_value = "wallet_features.csv")]
    output: PathBuf,
}

fn parse_strategy(s: &str) -> Result<Strategy> {
    match s {
        "model" => Ok(Strategy::Model),
        "baseline" => Ok(Strategy::Baseline),
        other => bail!("unknown strategy '{other}' (expected 'model' or 'baseline')"),
    }
}

fn parse_feature(s: &str) -> Result<Feature> {
    match Feature::ALL.iter().find(|f| f.name() == s) {
        Some(f) => Ok(*f),
        None => {
            let known: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
            bail!("unknown feature '{s}' (expected one of: {})", known.join(", "))
        }
    }
}

impl ScoreArgs {
    /// Layer command-line flags over the loaded configuration.
    fn apply(self, config: &mut PipelineConfig) -> Result<()> {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(plot) = self.plot {
            config.plot = plot;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = parse_strategy(&strategy)?;
        }
        if let Some(seed) = self.seed {
            config.model.seed = seed;
        }
        if !self.features.is_empty() {
            config.model.features = self
                .features
                .iter()
                .map(|s| parse_feature(s))
                .collect::<Result<_>>()?;
            config.model.validate()?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        PipelineConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    init_logging(&config.log_level, &config.log_format);

    match cli.command {
        Commands::Score(args) => score(args, config),
        Commands::Features(args) => features(args, config),
    }
}

fn score(args: ScoreArgs, mut config: PipelineConfig) -> Result<()> {
    args.apply(&mut config)?;
    let input = match &config.input {
        Some(p) => p.clone(),
        None => bail!("no input file: pass --input or set `input` in the configuration"),
    };

    let summary = Pipeline::new(config)
        .run()
        .with_context(|| format!("failed to score {}", input.display()))?;

    info!(
        events = summary.events,
        wallets = summary.wallets,
        scores = %summary.scores_path.display(),
        plot = %summary.plot_path.display(),
        "scoring complete"
    );
    if let Some(report) = summary.report {
        println!(
            "Model fit: train R2 {:.4} (n={}), test R2 {:.4} MAE {:.2} RMSE {:.2} (n={})",
            report.train.r2,
            report.n_train,
            report.test.r2,
            report.test.mae,
            report.test.rmse,
            report.n_test
        );
    }
    println!("Scored {} wallets", summary.wallets);
    println!("Credit scores saved to {}", summary.scores_path.display());
    println!("Score distribution plot saved to {}", summary.plot_path.display());
    Ok(())
}

fn features(args: FeaturesArgs, mut config: PipelineConfig) -> Result<()> {
    if let Some(input) = args.input {
        config.input = Some(input);
    }
    let pipeline = Pipeline::new(config);
    let wallets = pipeline
        .export_features(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(wallets, path = %args.output.display(), "feature table written");
    println!("Feature table for {wallets} wallets saved to {}", args.output.display());
    Ok(())
}

/// Initialize the tracing subscriber with the given level and format.
///
/// `RUST_LOG` overrides `level_str` when set.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}

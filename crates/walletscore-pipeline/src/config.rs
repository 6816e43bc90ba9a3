//! Pipeline configuration.
//!
//! [`PipelineConfig`] is assembled from layered sources, lowest precedence
//! first:
//!
//! 1. built-in defaults,
//! 2. a TOML file (explicit path, or `walletscore.toml` in the working
//!    directory when present),
//! 3. `WALLETSCORE_*` environment variables, with `__` separating nested
//!    keys (`WALLETSCORE_MODEL__SEED=7`, `WALLETSCORE_HEURISTIC__BASE=50`).
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use walletscore_model::{HeuristicWeights, ModelParams};

use crate::error::PipelineError;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "walletscore";
pub const ENV_PREFIX: &str = "WALLETSCORE";

/// How final scores are produced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Gradient-boosted regression fitted to heuristic pseudo-labels.
    #[default]
    Model,
    /// Closed-form z-score formula. No training.
    Baseline,
}

/// Configuration for a scoring run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// JSON export to score.
    pub input: Option<PathBuf>,
    /// Scores CSV destination.
    pub output: PathBuf,
    /// Histogram SVG destination.
    pub plot: PathBuf,
    /// Log level filter string (e.g. "info", "walletscore_model=debug").
    pub log_level: String,
    /// "text" or "json".
    pub log_format: String,
    pub strategy: Strategy,
    pub heuristic: HeuristicWeights,
    pub model: ModelParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from("wallet_credit_scores.csv"),
            plot: PathBuf::from("score_distribution.svg"),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            strategy: Strategy::default(),
            heuristic: HeuristicWeights::default(),
            model: ModelParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from `file` (required when given) and the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, PipelineError> {
        Self::load_with_env(file, None)
    }

    /// As [`load`](Self::load), reading environment variables from `env`
    /// instead of the process when it is `Some`.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, PipelineError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let cfg: PipelineConfig = Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        cfg.model.validate()?;
        Ok(cfg)
    }
}

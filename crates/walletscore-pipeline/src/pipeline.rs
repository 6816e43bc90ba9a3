//! Scoring run orchestration.
//!
//! [`Scorer`] is the in-memory core: events in, per-wallet scores out.
//! [`Pipeline`] wraps it with file ingestion and the output sinks.

use std::path::{Path, PathBuf};

use tracing::info;

use walletscore_core::aggregate::aggregate;
use walletscore_core::error::ModelError;
use walletscore_core::traits::LabelHeuristic;
use walletscore_core::types::{Event, WalletFeatures, WalletScore};
use walletscore_model::{
    finalize, fit_score_model, BaselineScorer, FitReport, ModelParams, PseudoScorer,
};

use crate::config::{PipelineConfig, Strategy};
use crate::error::PipelineError;
use crate::histogram::Histogram;
use crate::ingest::load_events;
use crate::sink::{commit_all, features_csv, scores_csv, Artifact};

/// Everything computed for one population.
#[derive(Debug, Clone)]
pub struct ScoringRun {
    /// Aggregated features, sorted by wallet.
    pub features: Vec<WalletFeatures>,
    /// Heuristic pseudo-score per wallet, aligned with `features`.
    pub labels: Vec<f64>,
    /// Final scores, aligned with `features`.
    pub scores: Vec<WalletScore>,
    /// Present when the model strategy ran.
    pub report: Option<FitReport>,
}

/// Turns events into final scores according to a strategy.
#[derive(Debug, Clone)]
pub struct Scorer {
    strategy: Strategy,
    heuristic: PseudoScorer,
    params: ModelParams,
}

impl Scorer {
    pub fn new(strategy: Strategy, heuristic: PseudoScorer, params: ModelParams) -> Self {
        Self {
            strategy,
            heuristic,
            params,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.strategy,
            PseudoScorer::new(config.heuristic.clone()),
            config.model.clone(),
        )
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn score_events(&self, events: &[Event]) -> Result<ScoringRun, ModelError> {
        self.score_table(aggregate(events))
    }

    pub fn score_table(&self, features: Vec<WalletFeatures>) -> Result<ScoringRun, ModelError> {
        let labels = self.heuristic.label_all(&features);

        let (predictions, report) = match self.strategy {
            Strategy::Model => {
                let trained = fit_score_model(&features, &labels, &self.params)?;
                (trained.model.predict(&features)?, Some(trained.report))
            }
            Strategy::Baseline => (BaselineScorer::new().score_all(&features), None),
        };
        let scores = finalize(&features, &predictions)?;

        Ok(ScoringRun {
            features,
            labels,
            scores,
            report,
        })
    }
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub events: usize,
    pub defaulted_fields: usize,
    pub wallets: usize,
    pub report: Option<FitReport>,
    pub scores_path: PathBuf,
    pub plot_path: PathBuf,
}

/// File-to-file scoring job.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn input(&self) -> Result<&Path, PipelineError> {
        self.config
            .input
            .as_deref()
            .ok_or(PipelineError::MissingInput)
    }

    /// Score the configured input and write the CSV and histogram.
    ///
    /// Either both outputs are written or neither is.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let normalized = load_events(self.input()?)?;
        let run = Scorer::from_config(&self.config).score_events(&normalized.events)?;
        info!(
            wallets = run.scores.len(),
            strategy = ?self.config.strategy,
            "pipeline: scores computed"
        );

        let values: Vec<f64> = run.scores.iter().map(|s| s.score).collect();
        commit_all(&[
            Artifact::new(&self.config.output, scores_csv(&run.scores)),
            Artifact::new(&self.config.plot, Histogram::from_scores(&values).to_svg()),
        ])?;

        Ok(RunSummary {
            events: normalized.events.len(),
            defaulted_fields: normalized.defaulted_fields,
            wallets: run.scores.len(),
            report: run.report,
            scores_path: self.config.output.clone(),
            plot_path: self.config.plot.clone(),
        })
    }

    /// Write the aggregated feature table with pseudo-labels to `output`.
    /// Returns the number of wallets written.
    pub fn export_features(&self, output: &Path) -> Result<usize, PipelineError> {
        let normalized = load_events(self.input()?)?;
        let table = aggregate(&normalized.events);
        let labels = PseudoScorer::new(self.config.heuristic.clone()).label_all(&table);
        commit_all(&[Artifact::new(output, features_csv(&table, &labels))])?;
        Ok(table.len())
    }
}

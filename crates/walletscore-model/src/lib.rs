//! # walletscore-model — Pseudo-labelling and score regression.
//!
//! Turns per-wallet feature vectors into published credit scores:
//! - **Heuristic labels**: a closed-form, log/tanh-compressed pseudo-score
//!   per wallet, used only as a training target.
//! - **Gradient boosting**: depth-limited regression trees fitted to the
//!   pseudo-scores on a seeded 80/20 split, then applied to every wallet
//!   to produce smoothed scores.
//! - **Post-processing**: predictions clamped into `[0, 1000]` and paired
//!   with their wallet identifiers.
//! - **Baseline**: the earlier z-score formula, kept as an alternative scorer.

pub mod baseline;
pub mod dataset;
pub mod gbdt;
pub mod heuristic;
pub mod metrics;
pub mod postprocess;
pub mod trainer;
pub mod tree;

pub use baseline::BaselineScorer;
pub use gbdt::{BoostingParams, GradientBoostedRegressor};
pub use heuristic::{HeuristicWeights, PseudoScorer};
pub use postprocess::finalize;
pub use trainer::{fit_score_model, FitReport, ModelParams, ScoreModel, TrainedModel};
pub use tree::{RegressionTree, TreeParams};

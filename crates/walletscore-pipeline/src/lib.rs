//! # walletscore-pipeline — End-to-end scoring run.
//!
//! Composes the walletscore crates into a batch job:
//! - [`config::PipelineConfig`] — layered configuration (file, env, defaults)
//! - [`ingest`] — JSON export loading
//! - [`pipeline::Scorer`] — features, pseudo-labels, model fit, final scores
//! - [`sink`] — CSV rendering and the all-or-nothing output commit
//! - [`histogram`] — score distribution chart (SVG)
//! - [`pipeline::Pipeline`] — a full run from input file to both artifacts

pub mod config;
pub mod error;
pub mod histogram;
pub mod ingest;
pub mod pipeline;
pub mod sink;

pub use config::{PipelineConfig, Strategy};
pub use error::PipelineError;
pub use pipeline::{Pipeline, RunSummary, Scorer, ScoringRun};

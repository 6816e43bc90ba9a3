//! # walletscore-core
//! Foundation types, input normalization, and per-wallet feature aggregation.

pub mod aggregate;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use aggregate::{aggregate, FeatureAggregator};
pub use error::{InputError, ModelError, ScoreError};
pub use normalize::{normalize_json, normalize_records, Normalized};
pub use traits::{LabelHeuristic, Regressor};
pub use types::{clamp_score, ActionKind, Event, Feature, WalletFeatures, WalletScore};

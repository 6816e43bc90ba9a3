//! Error types for walletscore.
use thiserror::Error;

/// Structural problems with the raw event export. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("top-level input is not a list of records")] NotAnArray,
    #[error("record {index} is not an object")] RecordNotObject { index: usize },
    #[error("record {index} has no wallet identifier")] MissingWallet { index: usize },
    #[error("record {index} has no action")] MissingAction { index: usize },
    #[error("json: {0}")] Json(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("degenerate split: {wallets} wallets, need at least {minimum}")] DegenerateSplit { wallets: usize, minimum: usize },
    #[error("empty dataset")] EmptyDataset,
    #[error("label count mismatch: {rows} rows, {labels} labels")] LabelCountMismatch { rows: usize, labels: usize },
    #[error("dimension mismatch: expected {expected}, got {got}")] DimensionMismatch { expected: usize, got: usize },
    #[error("invalid parameter: {0}")] InvalidParameter(String),
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error(transparent)] Input(#[from] InputError),
    #[error(transparent)] Model(#[from] ModelError),
}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        InputError::Json(e.to_string())
    }
}

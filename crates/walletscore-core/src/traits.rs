//! Trait interfaces between crates.
//!
//! - [`LabelHeuristic`] — closed-form pseudo-score used as a training target
//!   (walletscore-model implements)
//! - [`Regressor`] — fitted model mapping a feature row to a score
//!   (walletscore-model implements)
//!
//! Labelling and prediction are kept apart so the heuristic can be validated
//! on its own before it is trusted as a training signal.

use crate::error::ModelError;
use crate::types::WalletFeatures;

/// Deterministic per-wallet label, computed from features alone.
pub trait LabelHeuristic: Send + Sync {
    /// Pseudo-score for one wallet, in `[SCORE_MIN, SCORE_MAX]`.
    fn label(&self, features: &WalletFeatures) -> f64;

    /// Labels for a whole feature table, in the same order.
    ///
    /// Default implementation maps [`label`](Self::label) over the slice.
    fn label_all(&self, table: &[WalletFeatures]) -> Vec<f64> {
        table.iter().map(|f| self.label(f)).collect()
    }
}

/// A fitted regression model.
pub trait Regressor: Send + Sync {
    /// Number of input columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predict one raw (unclamped) value for a feature row.
    fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// Predict every row.
    ///
    /// Default implementation calls [`predict_row`](Self::predict_row) per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}

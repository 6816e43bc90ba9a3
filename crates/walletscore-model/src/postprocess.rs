//! Final score assembly: clamp each prediction and pair it with its wallet.

use walletscore_core::error::ModelError;
use walletscore_core::types::{clamp_score, WalletFeatures, WalletScore};

/// One [`WalletScore`] per row of `table`, in table order.
///
/// `predictions[i]` belongs to `table[i]`. Clamping is idempotent, so
/// already-bounded values pass through unchanged.
pub fn finalize(table: &[WalletFeatures], predictions: &[f64]) -> Result<Vec<WalletScore>, ModelError> {
    if table.len() != predictions.len() {
        return Err(ModelError::LabelCountMismatch {
            rows: table.len(),
            labels: predictions.len(),
        });
    }
    Ok(table
        .iter()
        .zip(predictions)
        .map(|(f, &p)| WalletScore {
            wallet: f.wallet.clone(),
            score: clamp_score(p),
        })
        .collect())
}

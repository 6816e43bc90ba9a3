//! Closed-form pseudo-score used to supervise the regression model.
//!
//! ```text
//! pseudo = base
//!        + deposit     * ln(1 + total_deposit)
//!        - liquidation * ln(1 + liquidation_count)
//!        + repayment   * repayment_ratio
//!        + frequency   * ln(1 + tx_frequency)
//!        + responsible_borrowing * tanh(total_borrow * repayment_ratio / (total_deposit + 1))
//! ```
//!
//! clamped into `[0, 1000]`. `ln(1 + x)` compresses heavy-tailed magnitudes
//! and `tanh` saturates the borrowing interaction term.

use serde::{Deserialize, Serialize};

use walletscore_core::traits::LabelHeuristic;
use walletscore_core::types::{clamp_score, WalletFeatures};

/// Coefficients of the pseudo-score. Defaults are the reference weights.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HeuristicWeights {
    pub base: f64,
    pub deposit: f64,
    /// Subtracted per `ln(1 + liquidation_count)`.
    pub liquidation: f64,
    pub repayment: f64,
    pub frequency: f64,
    pub responsible_borrowing: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            base: 100.0,
            deposit: 300.0,
            liquidation: 200.0,
            repayment: 300.0,
            frequency: 150.0,
            responsible_borrowing: 200.0,
        }
    }
}

/// Compute the clamped pseudo-score for one wallet.
pub fn pseudo_score(f: &WalletFeatures, w: &HeuristicWeights) -> f64 {
    let interaction = f.total_borrow * f.repayment_ratio / (f.total_deposit + 1.0);
    // inf / inf when both sums overflowed
    let interaction = if interaction.is_nan() {
        0.0
    } else {
        interaction.tanh()
    };

    let raw = w.base + w.deposit * f.total_deposit.ln_1p()
        - w.liquidation * (f.liquidation_count as f64).ln_1p()
        + w.repayment * f.repayment_ratio
        + w.frequency * (f.tx_frequency as f64).ln_1p()
        + w.responsible_borrowing * interaction;

    clamp_score(raw)
}

/// [`LabelHeuristic`] backed by [`pseudo_score`].
#[derive(Debug, Clone, Default)]
pub struct PseudoScorer {
    weights: HeuristicWeights,
}

impl PseudoScorer {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }
}

impl LabelHeuristic for PseudoScorer {
    fn label(&self, features: &WalletFeatures) -> f64 {
        pseudo_score(features, &self.weights)
    }
}

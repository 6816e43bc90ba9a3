//! Baseline scorer: a fixed linear formula over z-scored features.
//!
//! ```text
//! score = 200 + 300 * z_deposit / (z_borrow + 1) + 400 * z_repayment
//!             - 100 * z_liquidations + 50 * z_frequency
//! ```
//!
//! Standardization uses the population standard deviation; a column with
//! zero variance standardizes to 0. The ratio term contributes 0 when it is
//! not finite. Needs no training and works on any population size.

use walletscore_core::types::{clamp_score, Feature, WalletFeatures};

use crate::dataset::feature_rows;

/// Column order of the standardized matrix.
const COLUMNS: [Feature; 5] = Feature::ALL;
const FREQ: usize = 0;
const DEPOSIT: usize = 1;
const BORROW: usize = 2;
const LIQ: usize = 3;
const REPAY: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineScorer;

impl BaselineScorer {
    pub fn new() -> Self {
        Self
    }

    /// Clamped scores for every wallet, in table order.
    pub fn score_all(&self, table: &[WalletFeatures]) -> Vec<f64> {
        let z = standardize(&feature_rows(table, &COLUMNS));
        z.iter()
            .map(|r| {
                let ratio = r[DEPOSIT] / (r[BORROW] + 1.0);
                let ratio = if ratio.is_finite() { ratio } else { 0.0 };
                clamp_score(
                    200.0 + 300.0 * ratio + 400.0 * r[REPAY] - 100.0 * r[LIQ] + 50.0 * r[FREQ],
                )
            })
            .collect()
    }
}

/// Column-wise `(x - mean) / std`.
fn standardize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let n = rows.len() as f64;
    let width = first.len();

    let mut mean = vec![0.0; width];
    for r in rows {
        for (m, v) in mean.iter_mut().zip(r) {
            *m += v / n;
        }
    }
    let mut std = vec![0.0; width];
    for r in rows {
        for j in 0..width {
            let d = r[j] - mean[j];
            std[j] += d * d / n;
        }
    }
    for s in &mut std {
        *s = s.sqrt();
    }

    rows.iter()
        .map(|r| {
            (0..width)
                .map(|j| {
                    if std[j] > 0.0 && std[j].is_finite() {
                        (r[j] - mean[j]) / std[j]
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

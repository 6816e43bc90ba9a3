//! Feature matrix construction and the seeded train/test split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use walletscore_core::error::ModelError;
use walletscore_core::types::{Feature, WalletFeatures};

/// Dense feature matrix, one row per wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl Dataset {
    /// Build from a feature table and its labels.
    ///
    /// Non-finite feature values (overflowed USD sums) are replaced by
    /// `f64::MAX` so tree thresholds stay finite.
    pub fn from_table(
        table: &[WalletFeatures],
        labels: &[f64],
        features: &[Feature],
    ) -> Result<Self, ModelError> {
        if table.len() != labels.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: table.len(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            rows: feature_rows(table, features),
            labels: labels.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows and labels at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Feature rows for a table, with non-finite values saturated to `f64::MAX`.
pub fn feature_rows(table: &[WalletFeatures], features: &[Feature]) -> Vec<Vec<f64>> {
    table
        .iter()
        .map(|f| {
            f.row(features)
                .into_iter()
                .map(|v| if v.is_finite() { v } else { f64::MAX })
                .collect()
        })
        .collect()
}

/// Row indices of the two partitions, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and hold out `ceil(n * test_fraction)` rows.
///
/// Fails with [`ModelError::DegenerateSplit`] when `n < min_rows` or when
/// either partition would be empty.
pub fn train_test_split(
    n: usize,
    test_fraction: f64,
    seed: u64,
    min_rows: usize,
) -> Result<TrainTestSplit, ModelError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let minimum = min_rows.max(2);
    if n < minimum {
        return Err(ModelError::DegenerateSplit { wallets: n, minimum });
    }

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ModelError::DegenerateSplit { wallets: n, minimum });
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let mut test = order[..n_test].to_vec();
    let mut train = order[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Ok(TrainTestSplit { train, test })
}

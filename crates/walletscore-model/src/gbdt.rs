//! Gradient-boosted regression trees (squared-error loss).
//!
//! The model starts from the mean target and adds one shallow tree per stage,
//! each fitted to the current residuals and shrunk by the learning rate.
//! With `subsample < 1.0` every stage fits on a random row sample drawn
//! from a seeded RNG, so a given seed always reproduces the same model.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use walletscore_core::error::ModelError;
use walletscore_core::traits::Regressor;

use crate::tree::{RegressionTree, TreeParams};

/// Boosting hyperparameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub tree: TreeParams,
    /// Fraction of rows each stage is fitted on, in `(0, 1]`.
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            tree: TreeParams::default(),
            subsample: 1.0,
            seed: walletscore_core::constants::DEFAULT_SEED,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }
        if self.tree.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A fitted boosted ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoostedRegressor {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostedRegressor {
    /// Fit on `rows` / `targets`.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: &BoostingParams) -> Result<Self, ModelError> {
        params.validate()?;
        if rows.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if rows.len() != targets.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: rows.len(),
                labels: targets.len(),
            });
        }
        let n_features = rows[0].len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n_features) {
            return Err(ModelError::DimensionMismatch {
                expected: n_features,
                got: bad.len(),
            });
        }

        let n = rows.len();
        let init = targets.iter().sum::<f64>() / n as f64;
        let mut current = vec![init; n];
        let mut residuals = vec![0.0; n];
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let sample_size = ((n as f64 * params.subsample).round() as usize).clamp(1, n);
        let all_rows: Vec<usize> = (0..n).collect();

        for _ in 0..params.n_estimators {
            for i in 0..n {
                residuals[i] = targets[i] - current[i];
            }

            let tree = if sample_size < n {
                let mut sample = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                sample.sort_unstable();
                RegressionTree::fit(rows, &residuals, &sample, &params.tree)
            } else {
                RegressionTree::fit(rows, &residuals, &all_rows, &params.tree)
            };

            for (i, row) in rows.iter().enumerate() {
                current[i] += params.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        let mse = targets
            .iter()
            .zip(&current)
            .map(|(t, c)| (t - c) * (t - c))
            .sum::<f64>()
            / n as f64;
        debug!(
            rows = n,
            n_features,
            stages = trees.len(),
            train_mse = mse,
            "gbdt: ensemble fitted"
        );

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            trees,
            n_features,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean of the training targets; the prediction before any stage.
    pub fn base_value(&self) -> f64 {
        self.init
    }
}

impl Regressor for GradientBoostedRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        Ok(self.init
            + self.learning_rate * self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>())
    }
}

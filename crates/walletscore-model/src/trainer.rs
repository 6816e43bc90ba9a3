//! Score model training and prediction.
//!
//! [`fit_score_model`] takes the feature table and its pseudo-labels, holds
//! out a seeded test partition, fits a [`GradientBoostedRegressor`] on the
//! rest, and reports fit quality on both partitions. The returned
//! [`ScoreModel`] then predicts for every wallet, held-out ones included.

use serde::{Deserialize, Serialize};
use tracing::info;

use walletscore_core::constants::{DEFAULT_SEED, DEFAULT_TEST_FRACTION, MIN_TRAINING_WALLETS};
use walletscore_core::error::ModelError;
use walletscore_core::traits::Regressor;
use walletscore_core::types::{Feature, WalletFeatures};

use crate::dataset::{feature_rows, train_test_split, Dataset};
use crate::gbdt::{BoostingParams, GradientBoostedRegressor};
use crate::metrics::FitMetrics;
use crate::tree::TreeParams;

/// Everything that shapes a fit. Defaults reproduce the reference model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelParams {
    /// Input columns, in order.
    pub features: Vec<Feature>,
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub subsample: f64,
    pub test_fraction: f64,
    pub seed: u64,
    /// Smallest wallet population accepted for training.
    pub min_wallets: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            features: Feature::ALL.to_vec(),
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 1.0,
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            min_wallets: MIN_TRAINING_WALLETS,
        }
    }
}

impl ModelParams {
    pub fn boosting(&self) -> BoostingParams {
        BoostingParams {
            n_estimators: self.n_estimators,
            learning_rate: self.learning_rate,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
            },
            subsample: self.subsample,
            seed: self.seed,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.features.is_empty() {
            return Err(ModelError::InvalidParameter(
                "at least one feature is required".to_string(),
            ));
        }
        for (i, f) in self.features.iter().enumerate() {
            if self.features[..i].contains(f) {
                return Err(ModelError::InvalidParameter(format!(
                    "feature {} listed twice",
                    f.name()
                )));
            }
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.boosting().validate()
    }
}

/// Fit quality on the training and held-out partitions.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub n_train: usize,
    pub n_test: usize,
    pub train: FitMetrics,
    pub test: FitMetrics,
}

/// A fitted regressor bound to the feature columns it was trained on.
#[derive(Debug, Clone)]
pub struct ScoreModel {
    features: Vec<Feature>,
    regressor: GradientBoostedRegressor,
}

impl ScoreModel {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Raw (unclamped) predictions for every wallet, in table order.
    pub fn predict(&self, table: &[WalletFeatures]) -> Result<Vec<f64>, ModelError> {
        self.regressor.predict(&feature_rows(table, &self.features))
    }
}

/// Output of [`fit_score_model`].
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: ScoreModel,
    pub report: FitReport,
}

/// Fit the score model on a seeded train partition and evaluate on the rest.
///
/// Fails with [`ModelError::DegenerateSplit`] when the population is below
/// `params.min_wallets` or a partition would be empty.
pub fn fit_score_model(
    table: &[WalletFeatures],
    labels: &[f64],
    params: &ModelParams,
) -> Result<TrainedModel, ModelError> {
    params.validate()?;
    let dataset = Dataset::from_table(table, labels, &params.features)?;
    let split = train_test_split(
        dataset.len(),
        params.test_fraction,
        params.seed,
        params.min_wallets,
    )?;

    let train = dataset.subset(&split.train);
    let test = dataset.subset(&split.test);
    let regressor = GradientBoostedRegressor::fit(&train.rows, &train.labels, &params.boosting())?;

    let report = FitReport {
        n_train: train.len(),
        n_test: test.len(),
        train: FitMetrics::compute(&train.labels, &regressor.predict(&train.rows)?),
        test: FitMetrics::compute(&test.labels, &regressor.predict(&test.rows)?),
    };
    info!(
        n_train = report.n_train,
        n_test = report.n_test,
        train_r2 = report.train.r2,
        test_r2 = report.test.r2,
        test_mae = report.test.mae,
        test_rmse = report.test.rmse,
        "trainer: score model fitted"
    );

    Ok(TrainedModel {
        model: ScoreModel {
            features: params.features.clone(),
            regressor,
        },
        report,
    })
}

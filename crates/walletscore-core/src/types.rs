//! Core data model: normalized events, per-wallet features, final scores.
//!
//! USD amounts are `f64`. Counts are `u64`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ACTION_BORROW, ACTION_DEPOSIT, ACTION_LIQUIDATION, ACTION_REPAY, SCORE_MAX, SCORE_MIN,
};

/// Kind of lending-protocol action. Parsed case-sensitively from the export.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Deposit,
    Borrow,
    Repay,
    #[serde(rename = "liquidationcall")]
    LiquidationCall,
    /// Any action the scorer does not distinguish (e.g. `redeemunderlying`).
    Other,
}

impl ActionKind {
    /// Map a raw action literal to its kind. Unknown or differently-cased
    /// literals map to [`ActionKind::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            ACTION_DEPOSIT => Self::Deposit,
            ACTION_BORROW => Self::Borrow,
            ACTION_REPAY => Self::Repay,
            ACTION_LIQUIDATION => Self::LiquidationCall,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Deposit => ACTION_DEPOSIT,
            Self::Borrow => ACTION_BORROW,
            Self::Repay => ACTION_REPAY,
            Self::LiquidationCall => ACTION_LIQUIDATION,
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// One action by one wallet, after normalization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    /// Wallet identifier (non-empty).
    pub wallet: String,
    pub action: ActionKind,
    /// Raw asset amount, `>= 0`.
    pub amount: f64,
    /// Asset unit price in USD, `>= 0`.
    pub price_usd: f64,
    /// Transaction hash, if the export carried one.
    pub tx_hash: Option<String>,
}

impl Event {
    pub fn new(wallet: impl Into<String>, action: ActionKind, amount: f64, price_usd: f64) -> Self {
        Self {
            wallet: wallet.into(),
            action,
            amount,
            price_usd,
            tx_hash: None,
        }
    }

    /// Derived USD value of the action: `amount * price_usd`.
    pub fn amount_usd(&self) -> f64 {
        self.amount * self.price_usd
    }
}

/// Behavioral features of a single wallet.
///
/// Every field is non-negative; `repayment_ratio` is in `[0, 1]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WalletFeatures {
    pub wallet: String,
    /// Number of events of any kind.
    pub tx_frequency: u64,
    /// Sum of USD amounts over deposit events.
    pub total_deposit: f64,
    /// Sum of USD amounts over borrow events.
    pub total_borrow: f64,
    /// Number of liquidation events.
    pub liquidation_count: u64,
    /// Repaid USD over borrowed USD, `0` when nothing was borrowed.
    pub repayment_ratio: f64,
}

impl WalletFeatures {
    /// Feature values in the order given by `features`.
    pub fn row(&self, features: &[Feature]) -> Vec<f64> {
        features.iter().map(|f| f.value(self)).collect()
    }
}

/// A model input column. The default model uses all five, in [`Feature::ALL`] order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    TxFrequency,
    TotalDeposit,
    TotalBorrow,
    LiquidationCount,
    RepaymentRatio,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::TxFrequency,
        Feature::TotalDeposit,
        Feature::TotalBorrow,
        Feature::LiquidationCount,
        Feature::RepaymentRatio,
    ];

    /// Column name used in tabular output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TxFrequency => "tx_frequency",
            Self::TotalDeposit => "total_deposit",
            Self::TotalBorrow => "total_borrow",
            Self::LiquidationCount => "liquidation_count",
            Self::RepaymentRatio => "repayment_ratio",
        }
    }

    pub fn value(&self, features: &WalletFeatures) -> f64 {
        match self {
            Self::TxFrequency => features.tx_frequency as f64,
            Self::TotalDeposit => features.total_deposit,
            Self::TotalBorrow => features.total_borrow,
            Self::LiquidationCount => features.liquidation_count as f64,
            Self::RepaymentRatio => features.repayment_ratio,
        }
    }
}

/// Final published score for one wallet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WalletScore {
    pub wallet: String,
    /// In `[SCORE_MIN, SCORE_MAX]`.
    pub score: f64,
}

/// Clamp a raw score into `[SCORE_MIN, SCORE_MAX]`. NaN maps to `SCORE_MIN`.
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.clamp(SCORE_MIN, SCORE_MAX)
}

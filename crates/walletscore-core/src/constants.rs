//! Scoring constants shared across crates.

/// Lowest publishable credit score.
pub const SCORE_MIN: f64 = 0.0;

/// Highest publishable credit score.
pub const SCORE_MAX: f64 = 1000.0;

/// Width of one histogram bin in score units.
pub const HISTOGRAM_BIN_WIDTH: f64 = 100.0;

/// Number of histogram bins covering `[SCORE_MIN, SCORE_MAX]`.
pub const HISTOGRAM_BINS: usize = 10;

/// Seed used for the train/test shuffle unless configured otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of wallets held out for fit validation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Smallest wallet population the trainer accepts.
pub const MIN_TRAINING_WALLETS: usize = 5;

/// Action literals as they appear in protocol exports. Matching is case-sensitive.
pub const ACTION_DEPOSIT: &str = "deposit";
pub const ACTION_BORROW: &str = "borrow";
pub const ACTION_REPAY: &str = "repay";
pub const ACTION_LIQUIDATION: &str = "liquidationcall";

/// Field names of the raw export schema.
pub const FIELD_WALLET: &str = "userWallet";
pub const FIELD_ACTION: &str = "action";
pub const FIELD_TX_HASH: &str = "txHash";
pub const FIELD_ACTION_DATA: &str = "actionData";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_PRICE_USD: &str = "assetPriceUSD";

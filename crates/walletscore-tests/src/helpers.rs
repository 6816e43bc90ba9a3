//! Shared test helpers for integration and adversarial tests.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use walletscore_pipeline::PipelineConfig;

/// One export record with quoted amount and price, as real exports carry them.
pub fn record(wallet: &str, action: &str, amount: f64, price: f64) -> Value {
    json!({
        "userWallet": wallet,
        "action": action,
        "actionData": {
            "amount": amount.to_string(),
            "assetPriceUSD": price.to_string(),
        }
    })
}

/// A record without `actionData`.
pub fn bare_record(wallet: &str, action: &str) -> Value {
    json!({ "userWallet": wallet, "action": action })
}

/// The two-wallet reference example: A deposits, borrows, repays in full;
/// B is liquidated once.
pub fn reference_records() -> Vec<Value> {
    vec![
        record("A", "deposit", 100.0, 1.0),
        record("A", "borrow", 50.0, 1.0),
        record("A", "repay", 50.0, 1.0),
        bare_record("B", "liquidationcall"),
    ]
}

/// Deterministic synthetic population of `wallets` wallets with varied
/// behaviour: savers, borrowers who repay in part or in full, and
/// occasional liquidations.
pub fn population(wallets: usize) -> Vec<Value> {
    let mut out = Vec::new();
    for i in 0..wallets {
        let w = format!("0x{i:040x}");
        let deposit = ((i * 37) % 101) as f64 * 0.05;
        out.push(record(&w, "deposit", deposit, 1.0));
        for _ in 0..(i % 4) {
            out.push(record(&w, "redeemunderlying", 1.0, 1.0));
        }
        if i % 3 == 0 {
            let borrow = (i % 7 + 1) as f64;
            out.push(record(&w, "borrow", borrow, 1.0));
            out.push(record(&w, "repay", borrow * (i % 5) as f64 / 4.0, 1.0));
        }
        if i % 11 == 0 {
            out.push(bare_record(&w, "liquidationcall"));
        }
    }
    out
}

/// Serialize `records` as a JSON array into `dir/name`.
pub fn write_export(dir: &Path, name: &str, records: &[Value]) -> PathBuf {
    let path = dir.join(name);
    let body = serde_json::to_string_pretty(&Value::Array(records.to_vec()))
        .expect("serialize export");
    std::fs::write(&path, body).expect("write export");
    path
}

/// Default configuration reading `input` and writing into `dir`.
pub fn config_for(dir: &Path, input: PathBuf) -> PipelineConfig {
    PipelineConfig {
        input: Some(input),
        output: dir.join("wallet_credit_scores.csv"),
        plot: dir.join("score_distribution.svg"),
        ..PipelineConfig::default()
    }
}

/// Parse a scores CSV body into `(wallet, score)` rows, skipping the header.
pub fn parse_scores_csv(body: &str) -> Vec<(String, f64)> {
    body.lines()
        .skip(1)
        .map(|line| {
            let (wallet, score) = line.rsplit_once(',').expect("two columns");
            (wallet.to_string(), score.parse().expect("numeric score"))
        })
        .collect()
}

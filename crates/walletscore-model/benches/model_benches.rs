//! Criterion benchmarks for walletscore-model critical operations.
//!
//! Covers: heuristic labelling, single tree fit, and full score model fit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use walletscore_core::traits::LabelHeuristic;
use walletscore_core::types::WalletFeatures;
use walletscore_model::dataset::feature_rows;
use walletscore_model::heuristic::PseudoScorer;
use walletscore_model::trainer::{fit_score_model, ModelParams};
use walletscore_model::tree::{RegressionTree, TreeParams};

fn population(n: usize) -> Vec<WalletFeatures> {
    (0..n)
        .map(|i| WalletFeatures {
            wallet: format!("0x{i:040x}"),
            tx_frequency: 1 + (i % 40) as u64,
            total_deposit: ((i * 7919) % 100_000) as f64,
            total_borrow: ((i * 104_729) % 50_000) as f64,
            liquidation_count: (i % 17 == 0) as u64,
            repayment_ratio: (i % 11) as f64 / 10.0,
        })
        .collect()
}

fn bench_labels(c: &mut Criterion) {
    let table = population(10_000);
    let scorer = PseudoScorer::default();
    c.bench_function("pseudo_labels_10k", |b| {
        b.iter(|| scorer.label_all(black_box(&table)))
    });
}

fn bench_tree_fit(c: &mut Criterion) {
    let table = population(2_000);
    let labels = PseudoScorer::default().label_all(&table);
    let rows = feature_rows(&table, &walletscore_core::types::Feature::ALL);
    let indices: Vec<usize> = (0..rows.len()).collect();
    c.bench_function("tree_fit_2k", |b| {
        b.iter(|| RegressionTree::fit(black_box(&rows), &labels, &indices, &TreeParams::default()))
    });
}

fn bench_model_fit(c: &mut Criterion) {
    let table = population(2_000);
    let labels = PseudoScorer::default().label_all(&table);
    let params = ModelParams::default();
    let mut group = c.benchmark_group("score_model");
    group.sample_size(10);
    group.bench_function("fit_2k_wallets", |b| {
        b.iter(|| fit_score_model(black_box(&table), &labels, &params))
    });
    group.finish();
}

criterion_group!(benches, bench_labels, bench_tree_fit, bench_model_fit);
criterion_main!(benches);

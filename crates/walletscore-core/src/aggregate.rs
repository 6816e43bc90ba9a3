//! Per-wallet feature aggregation.
//!
//! A single pass over the events accumulates running sums and counts into a
//! map keyed by wallet identifier; [`FeatureAggregator::finish`] then
//! materializes one [`WalletFeatures`] per wallet. The map is a `BTreeMap`,
//! so output is sorted by wallet identifier and identical across runs.
//!
//! Events may be fed in batches (`ingest` / `extend`) before `finish`.

use std::collections::BTreeMap;

use tracing::info;

use crate::types::{ActionKind, Event, WalletFeatures};

/// Running totals for one wallet.
#[derive(Debug, Clone, Default, PartialEq)]
struct WalletTally {
    events: u64,
    deposit_usd: f64,
    borrow_usd: f64,
    repay_usd: f64,
    liquidations: u64,
}

impl WalletTally {
    fn record(&mut self, event: &Event) {
        self.events += 1;
        let usd = event.amount_usd();
        match event.action {
            ActionKind::Deposit => self.deposit_usd += usd,
            ActionKind::Borrow => self.borrow_usd += usd,
            ActionKind::Repay => self.repay_usd += usd,
            ActionKind::LiquidationCall => self.liquidations += 1,
            ActionKind::Other => {}
        }
    }

    fn into_features(self, wallet: String) -> WalletFeatures {
        WalletFeatures {
            wallet,
            tx_frequency: self.events,
            total_deposit: self.deposit_usd,
            total_borrow: self.borrow_usd,
            liquidation_count: self.liquidations,
            repayment_ratio: repayment_ratio(self.repay_usd, self.borrow_usd),
        }
    }
}

/// `repaid / borrowed`, clamped into `[0, 1]`.
///
/// Zero borrow gives 0 even when the wallet repaid something. Non-finite
/// quotients (e.g. both sums overflowed to infinity) also give 0.
pub fn repayment_ratio(repaid_usd: f64, borrowed_usd: f64) -> f64 {
    if borrowed_usd <= 0.0 {
        return 0.0;
    }
    let ratio = repaid_usd / borrowed_usd;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Accumulates events into per-wallet totals.
#[derive(Debug, Clone, Default)]
pub struct FeatureAggregator {
    wallets: BTreeMap<String, WalletTally>,
    events_seen: u64,
}

impl FeatureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one event to its wallet's totals.
    pub fn ingest(&mut self, event: &Event) {
        self.events_seen += 1;
        if let Some(tally) = self.wallets.get_mut(&event.wallet) {
            tally.record(event);
            return;
        }
        let mut tally = WalletTally::default();
        tally.record(event);
        self.wallets.insert(event.wallet.clone(), tally);
    }

    /// Number of distinct wallets seen so far.
    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    /// Number of events ingested so far.
    pub fn event_count(&self) -> u64 {
        self.events_seen
    }

    /// Materialize one feature vector per wallet, sorted by wallet identifier.
    pub fn finish(self) -> Vec<WalletFeatures> {
        info!(
            events = self.events_seen,
            wallets = self.wallets.len(),
            "aggregate: wallet features built"
        );
        self.wallets
            .into_iter()
            .map(|(wallet, tally)| tally.into_features(wallet))
            .collect()
    }
}

impl<'a> Extend<&'a Event> for FeatureAggregator {
    fn extend<T: IntoIterator<Item = &'a Event>>(&mut self, iter: T) {
        for event in iter {
            self.ingest(event);
        }
    }
}

/// Aggregate a complete event set in one call.
pub fn aggregate<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<WalletFeatures> {
    let mut agg = FeatureAggregator::new();
    agg.extend(events);
    agg.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ev(wallet: &str, action: ActionKind, usd: f64) -> Event {
        Event::new(wallet, action, usd, 1.0)
    }

    #[test]
    fn deposit_borrow_repay_example() {
        let events = vec![
            ev("A", ActionKind::Deposit, 100.0),
            ev("A", ActionKind::Borrow, 50.0),
            ev("A", ActionKind::Repay, 50.0),
        ];
        let features = aggregate(&events);
        assert_eq!(features.len(), 1);
        let a = &features[0];
        assert_eq!(a.wallet, "A");
        assert_eq!(a.tx_frequency, 3);
        assert_eq!(a.total_deposit, 100.0);
        assert_eq!(a.total_borrow, 50.0);
        assert_eq!(a.liquidation_count, 0);
        assert_eq!(a.repayment_ratio, 1.0);
    }

    #[test]
    fn single_liquidation_only() {
        let features = aggregate(&[ev("L", ActionKind::LiquidationCall, 0.0)]);
        let l = &features[0];
        assert_eq!(l.tx_frequency, 1);
        assert_eq!(l.total_deposit, 0.0);
        assert_eq!(l.total_borrow, 0.0);
        assert_eq!(l.liquidation_count, 1);
        assert_eq!(l.repayment_ratio, 0.0);
    }

    #[test]
    fn repay_without_borrow_is_zero_ratio() {
        let features = aggregate(&[
            ev("R", ActionKind::Repay, 500.0),
            ev("R", ActionKind::Deposit, 10.0),
        ]);
        assert_eq!(features[0].repayment_ratio, 0.0);
        assert_eq!(features[0].total_borrow, 0.0);
    }

    #[test]
    fn over_repayment_caps_at_one() {
        let features = aggregate(&[
            ev("O", ActionKind::Borrow, 10.0),
            ev("O", ActionKind::Repay, 30.0),
        ]);
        assert_eq!(features[0].repayment_ratio, 1.0);
    }

    #[test]
    fn partial_repayment() {
        let features = aggregate(&[
            ev("P", ActionKind::Borrow, 80.0),
            ev("P", ActionKind::Repay, 20.0),
        ]);
        assert!((features[0].repayment_ratio - 0.25).abs() < 1e-12);
    }

    #[test]
    fn deposit_only_wallet_has_zeroes() {
        let features = aggregate(&[ev("D", ActionKind::Deposit, 5.0)]);
        let d = &features[0];
        assert_eq!(d.total_borrow, 0.0);
        assert_eq!(d.liquidation_count, 0);
        assert_eq!(d.repayment_ratio, 0.0);
    }

    #[test]
    fn other_actions_count_toward_frequency_only() {
        let features = aggregate(&[
            ev("X", ActionKind::Other, 1_000.0),
            ev("X", ActionKind::Other, 1_000.0),
        ]);
        let x = &features[0];
        assert_eq!(x.tx_frequency, 2);
        assert_eq!(x.total_deposit, 0.0);
        assert_eq!(x.total_borrow, 0.0);
    }

    #[test]
    fn output_sorted_by_wallet() {
        let features = aggregate(&[
            ev("c", ActionKind::Deposit, 1.0),
            ev("a", ActionKind::Deposit, 1.0),
            ev("b", ActionKind::Deposit, 1.0),
            ev("a", ActionKind::Borrow, 1.0),
        ]);
        let wallets: Vec<_> = features.iter().map(|f| f.wallet.as_str()).collect();
        assert_eq!(wallets, ["a", "b", "c"]);
    }

    #[test]
    fn batched_ingestion_matches_single_pass() {
        let events = vec![
            ev("a", ActionKind::Deposit, 3.0),
            ev("b", ActionKind::Borrow, 4.0),
            ev("a", ActionKind::Repay, 1.0),
            ev("b", ActionKind::Repay, 2.0),
        ];
        let mut agg = FeatureAggregator::new();
        agg.extend(&events[..2]);
        agg.extend(&events[2..]);
        assert_eq!(agg.event_count(), 4);
        assert_eq!(agg.wallet_count(), 2);
        assert_eq!(agg.finish(), aggregate(&events));
    }

    #[test]
    fn ratio_overflowed_sums_resolve_to_zero() {
        assert_eq!(repayment_ratio(f64::INFINITY, f64::INFINITY), 0.0);
        assert_eq!(repayment_ratio(f64::INFINITY, 1.0), 1.0);
        assert_eq!(repayment_ratio(1.0, f64::INFINITY), 0.0);
        assert_eq!(repayment_ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert!(aggregate(std::iter::empty::<&Event>()).is_empty());
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        (
            prop::sample::select(vec!["w1", "w2", "w3", "w4", "w5"]),
            prop::sample::select(vec![
                ActionKind::Deposit,
                ActionKind::Borrow,
                ActionKind::Repay,
                ActionKind::LiquidationCall,
                ActionKind::Other,
            ]),
            0.0f64..1e30,
            0.0f64..1e6,
        )
            .prop_map(|(w, a, amount, price)| Event::new(w, a, amount, price))
    }

    proptest! {
        #[test]
        fn features_within_bounds(events in prop::collection::vec(arb_event(), 0..200)) {
            for f in aggregate(&events) {
                prop_assert!((0.0..=1.0).contains(&f.repayment_ratio));
                prop_assert!(f.total_deposit >= 0.0);
                prop_assert!(f.total_borrow >= 0.0);
                prop_assert!(f.tx_frequency >= 1);
            }
        }

        #[test]
        fn aggregation_partitions_events(events in prop::collection::vec(arb_event(), 0..200)) {
            let features = aggregate(&events);
            let total: u64 = features.iter().map(|f| f.tx_frequency).sum();
            prop_assert_eq!(total, events.len() as u64);

            let mut distinct: Vec<&str> = events.iter().map(|e| e.wallet.as_str()).collect();
            distinct.sort_unstable();
            distinct.dedup();
            let wallets: Vec<&str> = features.iter().map(|f| f.wallet.as_str()).collect();
            prop_assert_eq!(wallets, distinct);

            for f in &features {
                let liquidations = events
                    .iter()
                    .filter(|e| e.wallet == f.wallet && e.action == ActionKind::LiquidationCall)
                    .count() as u64;
                prop_assert_eq!(f.liquidation_count, liquidations);
            }
        }

        #[test]
        fn aggregation_is_deterministic(events in prop::collection::vec(arb_event(), 0..100)) {
            prop_assert_eq!(aggregate(&events), aggregate(&events));
        }
    }
}

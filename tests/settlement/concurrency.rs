//! Concurrent writers against one key.

use std::thread;

use partner_settlement::lock::InMemoryLockManager;
use partner_settlement::{
    CreateOutcome, InMemoryLedger, KeyLayout, Ledger, MergeStrategy, SettlementError,
    SettlementStore, SettlementSummary,
};
use rust_decimal::Decimal;

use crate::support::{delta, transaction, RacingLedger};

const THREADS: usize = 8;
const DELTAS_PER_THREAD: usize = 25;

fn store_with<L: Ledger>(ledger: L, strategy: MergeStrategy) -> SettlementStore<L> {
    SettlementStore::with_lock_manager(
        ledger,
        InMemoryLockManager::new(),
        KeyLayout::Namespaced,
        strategy,
    )
}

#[test]
fn locked_merges_lose_no_updates() {
    let store = store_with(InMemoryLedger::new(), MergeStrategy::Locked);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..DELTAS_PER_THREAD {
                    store.aggregator().apply(&delta("SUM1", 1, 2, "USD")).unwrap();
                }
            });
        }
    });

    let total = (THREADS * DELTAS_PER_THREAD) as i64;
    let summary = store.aggregator().get("SUM1").unwrap().unwrap();
    assert_eq!(summary.loyalty_settlement_amount, Decimal::from(total));
    assert_eq!(summary.settlement_amount, Decimal::from(total * 2));
    assert!(store.locks().is_empty().unwrap());
}

#[test]
fn optimistic_merges_with_caller_retry_lose_no_updates() {
    let store = store_with(InMemoryLedger::new(), MergeStrategy::Optimistic);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..DELTAS_PER_THREAD {
                    loop {
                        match store.aggregator().apply(&delta("SUM1", 1, 2, "USD")) {
                            Ok(_) => break,
                            Err(SettlementError::Conflict { .. }) => continue,
                            Err(e) => panic!("unexpected error: {e}"),
                        }
                    }
                }
            });
        }
    });

    let total = (THREADS * DELTAS_PER_THREAD) as i64;
    let summary = store.aggregator().get("SUM1").unwrap().unwrap();
    assert_eq!(summary.loyalty_settlement_amount, Decimal::from(total));
    assert_eq!(summary.settlement_amount, Decimal::from(total * 2));
}

#[test]
fn interleaved_write_is_detected_not_overwritten() {
    let store = store_with(RacingLedger::new(), MergeStrategy::Optimistic);
    store.aggregator().apply(&delta("SUM1", 10, 5, "USD")).unwrap();

    let foreign = SettlementSummary::from_delta(&delta("SUM1", 100, 100, "USD"));
    store
        .ledger()
        .interfere_with(serde_json::to_vec(&foreign).unwrap());

    let err = store.aggregator().apply(&delta("SUM1", 1, 1, "USD")).unwrap_err();
    assert!(matches!(err, SettlementError::Conflict { ref key } if key == "summary:SUM1"));
    assert_eq!(err.status_code(), 409);
    assert!(err.is_retryable());

    // The concurrent write survives, and a retry folds into it.
    assert_eq!(store.aggregator().get("SUM1").unwrap().unwrap(), foreign);
    let retried = store.aggregator().apply(&delta("SUM1", 1, 1, "USD")).unwrap();
    assert_eq!(retried.loyalty_settlement_amount, Decimal::from(101));
}

#[test]
fn interleaved_create_keeps_the_first_writer() {
    let store = store_with(RacingLedger::new(), MergeStrategy::Optimistic);
    let first = transaction("R1", 1);
    store
        .ledger()
        .interfere_with(serde_json::to_vec(&first).unwrap());

    let outcome = store.recorder().record(&transaction("R1", 2)).unwrap();
    assert_eq!(outcome, CreateOutcome::AlreadyExists);
    assert_eq!(store.recorder().get("R1").unwrap().unwrap(), first);
}

#[test]
fn concurrent_creates_have_one_winner() {
    for strategy in [MergeStrategy::Locked, MergeStrategy::Optimistic] {
        let store = store_with(InMemoryLedger::new(), strategy);

        let outcomes: Vec<CreateOutcome> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let store = &store;
                    s.spawn(move || store.recorder().record(&transaction("R1", i as i64)).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let created = outcomes
            .iter()
            .filter(|o| **o == CreateOutcome::Created)
            .count();
        assert_eq!(created, 1, "{strategy:?}");
        assert!(store.recorder().get("R1").unwrap().is_some());
    }
}

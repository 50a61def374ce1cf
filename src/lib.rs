//! # partner_settlement
//!
//! Records partner-settlement transactions and maintains running settlement
//! summaries on top of a key-value ledger that offers only single-key
//! `get`, `put` and `delete`.
//!
//! - [`TransactionRecorder`]: write-once storage of transactions keyed by
//!   ROC reference number. A repeated create leaves the first record untouched.
//! - [`SettlementAggregator`]: folds settlement deltas into cumulative
//!   summaries. Amounts add up; currencies are pinned by the first delta.
//! - [`dispatch::Service`]: the `invoke` / `query` surface that maps
//!   operation names to handlers.
//!
//! Concurrent merges on one summary are serialized with per-key locks, or,
//! on ledgers with compare-and-swap, detected and rejected with
//! [`SettlementError::Conflict`] so the caller can retry.
//!
//! ## Example
//!
//! ```
//! use partner_settlement::{InMemoryLedger, SettlementStore};
//!
//! let store = SettlementStore::new(InMemoryLedger::new());
//! let aggregator = store.aggregator();
//!
//! aggregator.apply_json(r#"{"summarySettlementId":"SUM1","loyaltySettlementAmount":10,
//!     "settlementAmount":5,"isoCurrencyLoyalty":"USD","isoCurrency":"USD"}"#).unwrap();
//! let summary = aggregator.apply_json(r#"{"summarySettlementId":"SUM1","loyaltySettlementAmount":3,
//!     "settlementAmount":2,"isoCurrencyLoyalty":"EUR","isoCurrency":"EUR"}"#).unwrap();
//!
//! assert_eq!(summary.loyalty_settlement_amount, rust_decimal::Decimal::from(13));
//! assert_eq!(summary.iso_currency, "USD");
//! ```

mod aggregator;
pub mod config;
pub mod dispatch;
mod error;
mod keys;
pub mod ledger;
pub mod lock;
pub mod logging;
mod merge;
mod model;
mod recorder;
mod store;

pub use aggregator::SettlementAggregator;
pub use config::SettlementConfig;
pub use error::SettlementError;
pub use keys::{KeyLayout, KeySpace};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use merge::{CreateOutcome, MergeOutcome, MergeStrategy, Mergeable};
pub use model::{ConversionRateInfo, Record, SettlementDelta, SettlementSummary, TransactionRecord};
pub use recorder::TransactionRecorder;
pub use store::SettlementStore;

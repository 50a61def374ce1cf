//! Settlement Aggregator - cumulative settlement summaries.

use crate::error::SettlementError;
use crate::keys::KeySpace;
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::model::{SettlementDelta, SettlementSummary};
use crate::store::SettlementStore;

/// Merges settlement deltas into running summaries keyed by summary settlement id.
pub struct SettlementAggregator<'a, L, M> {
    store: &'a SettlementStore<L, M>,
}

impl<'a, L: Ledger, M: LockManager> SettlementAggregator<'a, L, M> {
    pub fn new(store: &'a SettlementStore<L, M>) -> Self {
        Self { store }
    }

    /// Fold `delta` into its summary, creating the summary on first use.
    ///
    /// Returns the summary as stored after the merge.
    pub fn apply(&self, delta: &SettlementDelta) -> Result<SettlementSummary, SettlementError> {
        let outcome = self.store.merge_or_create::<SettlementSummary>(delta)?;
        let created = outcome.is_created();
        let summary = outcome.into_inner();
        tracing::info!(
            summary_id = %summary.summary_settlement_id,
            created,
            loyalty_amount = %summary.loyalty_settlement_amount,
            settlement_amount = %summary.settlement_amount,
            currency = %summary.iso_currency,
            loyalty_currency = %summary.iso_currency_loyalty,
            "settlement summary updated"
        );
        Ok(summary)
    }

    /// Parse a serialized delta and apply it.
    ///
    /// A malformed payload aborts with `Parse`; nothing is merged.
    pub fn apply_json(&self, payload: &str) -> Result<SettlementSummary, SettlementError> {
        let delta: SettlementDelta = serde_json::from_str(payload).map_err(|e| {
            tracing::warn!(error = %e, "rejecting malformed settlement delta");
            SettlementError::from(e)
        })?;
        self.apply(&delta)
    }

    /// The stored summary bytes, exactly as written. `None` if not found.
    pub fn summary(&self, id: &str) -> Result<Option<Vec<u8>>, SettlementError> {
        let summary = self.store.read_raw(KeySpace::Summary, id)?;
        tracing::debug!(summary_id = %id, found = summary.is_some(), "summary lookup");
        Ok(summary)
    }

    /// The stored summary, decoded.
    pub fn get(&self, id: &str) -> Result<Option<SettlementSummary>, SettlementError> {
        self.store.read(id)
    }
}

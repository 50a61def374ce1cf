//! Transaction Recorder - write-once storage of partner transactions.

use crate::error::SettlementError;
use crate::keys::KeySpace;
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::merge::CreateOutcome;
use crate::model::TransactionRecord;
use crate::store::SettlementStore;

/// Records transactions keyed by their ROC reference number.
///
/// The first record stored under a reference number wins; later records
/// with the same reference number are discarded.
pub struct TransactionRecorder<'a, L, M> {
    store: &'a SettlementStore<L, M>,
}

impl<'a, L: Ledger, M: LockManager> TransactionRecorder<'a, L, M> {
    pub fn new(store: &'a SettlementStore<L, M>) -> Self {
        Self { store }
    }

    /// Store `record` if its reference number is new.
    pub fn record(&self, record: &TransactionRecord) -> Result<CreateOutcome, SettlementError> {
        let outcome = self.store.create_if_absent(record)?;
        match outcome {
            CreateOutcome::Created => tracing::info!(
                roc_reference_number = %record.roc_reference_number,
                amount = %record.transaction_amount,
                "transaction recorded"
            ),
            CreateOutcome::AlreadyExists => tracing::info!(
                roc_reference_number = %record.roc_reference_number,
                "transaction already recorded; input discarded"
            ),
        }
        Ok(outcome)
    }

    /// Parse a serialized transaction and record it.
    ///
    /// A malformed payload fails with `Parse` before the ledger is touched.
    pub fn record_json(&self, payload: &str) -> Result<CreateOutcome, SettlementError> {
        let record: TransactionRecord = serde_json::from_str(payload).map_err(|e| {
            tracing::warn!(error = %e, "rejecting malformed transaction payload");
            SettlementError::from(e)
        })?;
        self.record(&record)
    }

    /// Delete the transaction stored under `id`.
    pub fn delete(&self, id: &str) -> Result<(), SettlementError> {
        self.store.remove(KeySpace::Transaction, id)?;
        tracing::info!(roc_reference_number = %id, "transaction deleted");
        Ok(())
    }

    /// The stored transaction bytes, exactly as written. `None` if not found.
    pub fn detail(&self, id: &str) -> Result<Option<Vec<u8>>, SettlementError> {
        let detail = self.store.read_raw(KeySpace::Transaction, id)?;
        tracing::debug!(roc_reference_number = %id, found = detail.is_some(), "transaction lookup");
        Ok(detail)
    }

    /// The stored transaction, decoded.
    pub fn get(&self, id: &str) -> Result<Option<TransactionRecord>, SettlementError> {
        self.store.read(id)
    }
}

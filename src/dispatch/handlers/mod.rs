//! The settlement operations, one module per operation.
//!
//! Each module exports `SURFACE`, `OPERATION`, `guard` and `handle`, and is
//! registered with `register_operations!`.

pub mod create_input_transaction;
pub mod delete_transaction_entry;
pub mod get_settlement_summary;
pub mod get_transaction_detail;
pub mod update_settlement_summary;

use super::service::{Service, Surface};
use crate::error::SettlementError;
use crate::ledger::Ledger;
use crate::lock::LockManager;
use crate::store::SettlementStore;

/// Every operation the settlement service must expose.
pub const OPERATIONS: &[(Surface, &str)] = &[
    (create_input_transaction::SURFACE, create_input_transaction::OPERATION),
    (delete_transaction_entry::SURFACE, delete_transaction_entry::OPERATION),
    (update_settlement_summary::SURFACE, update_settlement_summary::OPERATION),
    (get_transaction_detail::SURFACE, get_transaction_detail::OPERATION),
    (get_settlement_summary::SURFACE, get_settlement_summary::OPERATION),
];

impl<L, M> Service<SettlementStore<L, M>>
where
    L: Ledger + 'static,
    M: LockManager + 'static,
{
    /// A service exposing the five settlement operations over `store`.
    pub fn settlement(store: SettlementStore<L, M>) -> Result<Self, SettlementError> {
        crate::register_operations!(
            Service::new(store),
            create_input_transaction,
            delete_transaction_entry,
            update_settlement_summary,
            get_transaction_detail,
            get_settlement_summary,
        )
        .validate(OPERATIONS)
    }
}

//! Ledger - the single-key storage capability the engine runs on.
//!
//! The engine only needs `get`, `put` and `delete` on opaque byte values.
//! Stores that can also compare-and-swap a single key enable the optimistic
//! merge strategy; everything else falls back to per-key locking.

mod error;
mod in_memory;

use std::sync::Arc;

pub use error::LedgerError;
pub use in_memory::InMemoryLedger;

/// Single-key get/put/delete store of record.
///
/// Keys and values are opaque to the ledger. No multi-key transactions are assumed.
pub trait Ledger: Send + Sync {
    /// Read the value stored under `key`. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove `key`. Removing a key that does not exist succeeds.
    fn delete(&self, key: &str) -> Result<(), LedgerError>;

    /// Store `value` under `key` only if the current value equals `expected`
    /// (`None` meaning the key must be absent).
    ///
    /// Returns `LedgerError::Conflict` when the current value differs.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        let _ = (key, expected, value);
        Err(LedgerError::Unsupported("compare_and_swap"))
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        (**self).delete(key)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        (**self).compare_and_swap(key, expected, value)
    }
}

//! InMemoryLedger - HashMap-backed ledger for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Ledger, LedgerError};

/// In-memory ledger backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same storage.
/// Supports atomic compare-and-swap on a single key.
#[derive(Clone)]
pub struct InMemoryLedger {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .storage
            .read()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl Ledger for InMemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| LedgerError::Poisoned("get"))?;
        Ok(storage.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| LedgerError::Poisoned("put"))?;
        storage.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| LedgerError::Poisoned("delete"))?;
        storage.remove(key);
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| LedgerError::Poisoned("compare_and_swap"))?;

        if storage.get(key).map(Vec::as_slice) != expected {
            return Err(LedgerError::Conflict {
                key: key.to_string(),
            });
        }

        storage.insert(key.to_string(), value);
        Ok(())
    }
}

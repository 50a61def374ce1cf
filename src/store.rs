//! SettlementStore - typed, key-aware access to the ledger.
//!
//! Owns the ledger handle, the per-key lock manager, the key layout and the
//! merge strategy. The recorder and the aggregator are thin views over it,
//! obtained with [`SettlementStore::recorder`] and [`SettlementStore::aggregator`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::aggregator::SettlementAggregator;
use crate::config::SettlementConfig;
use crate::error::SettlementError;
use crate::keys::{KeyLayout, KeySpace};
use crate::ledger::{Ledger, LedgerError};
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::merge::{CreateOutcome, MergeOutcome, MergeStrategy, Mergeable};
use crate::model::Record;
use crate::recorder::TransactionRecorder;

/// Shared state of the settlement engine: everything except the data,
/// which lives in the ledger.
pub struct SettlementStore<L, M = InMemoryLockManager> {
    ledger: L,
    locks: M,
    layout: KeyLayout,
    strategy: MergeStrategy,
}

impl<L: Ledger> SettlementStore<L> {
    /// Store with namespaced keys and locked merges.
    pub fn new(ledger: L) -> Self {
        Self::with_lock_manager(
            ledger,
            InMemoryLockManager::new(),
            KeyLayout::default(),
            MergeStrategy::default(),
        )
    }

    /// Store configured from the `ledger` and `merge` sections.
    pub fn from_config(ledger: L, config: &SettlementConfig) -> Self {
        Self::with_lock_manager(
            ledger,
            InMemoryLockManager::new(),
            config.ledger.key_layout,
            config.merge.strategy,
        )
    }
}

impl<L: Ledger, M: LockManager> SettlementStore<L, M> {
    pub fn with_lock_manager(
        ledger: L,
        locks: M,
        layout: KeyLayout,
        strategy: MergeStrategy,
    ) -> Self {
        Self {
            ledger,
            locks,
            layout,
            strategy,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The per-key lock manager used by the `Locked` strategy.
    pub fn locks(&self) -> &M {
        &self.locks
    }

    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// The transaction recorder view.
    pub fn recorder(&self) -> TransactionRecorder<'_, L, M> {
        TransactionRecorder::new(self)
    }

    /// The settlement aggregator view.
    pub fn aggregator(&self) -> SettlementAggregator<'_, L, M> {
        SettlementAggregator::new(self)
    }

    /// Ledger key for `id` in `space`. Fails on an empty id.
    pub fn key(&self, space: KeySpace, id: &str) -> Result<String, SettlementError> {
        self.layout.key(space, id)
    }

    /// The stored bytes for `id`, unmodified. `None` if never written.
    pub fn read_raw(&self, space: KeySpace, id: &str) -> Result<Option<Vec<u8>>, SettlementError> {
        let key = self.key(space, id)?;
        Ok(self.ledger.get(&key)?)
    }

    /// The stored record for `id`, decoded.
    pub fn read<T: Record>(&self, id: &str) -> Result<Option<T>, SettlementError> {
        let key = self.key(T::SPACE, id)?;
        match self.ledger.get(&key)? {
            Some(bytes) => Ok(Some(decode(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete the key for `id` unconditionally.
    pub fn remove(&self, space: KeySpace, id: &str) -> Result<(), SettlementError> {
        let key = self.key(space, id)?;
        match self.strategy {
            MergeStrategy::Locked => self.with_key_lock(&key, || Ok(self.ledger.delete(&key)?)),
            MergeStrategy::Optimistic => Ok(self.ledger.delete(&key)?),
        }
    }

    /// Write `record` only if its key is absent.
    ///
    /// When the key exists the stored bytes are written back unchanged and
    /// `record` is discarded, so the first writer wins.
    pub fn create_if_absent<T: Record>(&self, record: &T) -> Result<CreateOutcome, SettlementError> {
        let key = self.key(T::SPACE, record.id())?;
        let bytes = encode(record)?;

        match self.strategy {
            MergeStrategy::Locked => self.with_key_lock(&key, || match self.ledger.get(&key)? {
                None => {
                    self.ledger.put(&key, bytes)?;
                    Ok(CreateOutcome::Created)
                }
                Some(existing) => {
                    self.ledger.put(&key, existing)?;
                    Ok(CreateOutcome::AlreadyExists)
                }
            }),
            MergeStrategy::Optimistic => match self.ledger.get(&key)? {
                None => match self.ledger.compare_and_swap(&key, None, bytes) {
                    Ok(()) => Ok(CreateOutcome::Created),
                    Err(LedgerError::Conflict { .. }) => {
                        tracing::debug!(key = %key, "record created concurrently; keeping first write");
                        Ok(CreateOutcome::AlreadyExists)
                    }
                    Err(e) => Err(e.into()),
                },
                Some(existing) => {
                    self.ledger
                        .compare_and_swap(&key, Some(existing.as_slice()), existing.clone())?;
                    Ok(CreateOutcome::AlreadyExists)
                }
            },
        }
    }

    /// Fold `delta` into the record it addresses, creating the record if absent.
    pub fn merge_or_create<T: Mergeable>(
        &self,
        delta: &T::Delta,
    ) -> Result<MergeOutcome<T>, SettlementError> {
        let key = self.key(T::SPACE, T::delta_id(delta))?;

        match self.strategy {
            MergeStrategy::Locked => self.with_key_lock(&key, || {
                let previous = self.ledger.get(&key)?;
                let (outcome, bytes) = fold::<T>(&key, previous.as_deref(), delta)?;
                self.ledger.put(&key, bytes)?;
                Ok(outcome)
            }),
            MergeStrategy::Optimistic => {
                let previous = self.ledger.get(&key)?;
                let (outcome, bytes) = fold::<T>(&key, previous.as_deref(), delta)?;
                if let Err(e) = self.ledger.compare_and_swap(&key, previous.as_deref(), bytes) {
                    if matches!(e, LedgerError::Conflict { .. }) {
                        tracing::warn!(key = %key, "merge lost a concurrent update race");
                    }
                    return Err(e.into());
                }
                Ok(outcome)
            }
        }
    }

    fn with_key_lock<R>(
        &self,
        key: &str,
        f: impl FnOnce() -> Result<R, SettlementError>,
    ) -> Result<R, SettlementError> {
        let lock = self.locks.get_lock(key)?;
        // The guard and its lock handle drop at the end of the match, before release.
        let result = match LockGuard::acquire(lock) {
            Ok(_guard) => f(),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = self.locks.release(key) {
            tracing::warn!(key = %key, error = %e, "failed to release key lock entry");
        }
        result
    }
}

fn fold<T: Mergeable>(
    key: &str,
    previous: Option<&[u8]>,
    delta: &T::Delta,
) -> Result<(MergeOutcome<T>, Vec<u8>), SettlementError> {
    let outcome = match previous {
        None => MergeOutcome::Created(T::create(delta)),
        Some(bytes) => MergeOutcome::Merged(decode::<T>(key, bytes)?.merge(delta)?),
    };
    let bytes = encode(outcome.value())?;
    Ok((outcome, bytes))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SettlementError> {
    serde_json::to_vec(value).map_err(|e| SettlementError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, SettlementError> {
    serde_json::from_slice(bytes).map_err(|e| SettlementError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

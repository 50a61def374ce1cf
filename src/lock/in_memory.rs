use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::{Lock, LockError, LockManager};

/// In-memory key lock: a held flag guarded by a `Mutex`, with waiters parked
/// on a `Condvar` until the holder releases it.
#[derive(Default)]
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }

    /// True while some caller holds the lock.
    pub fn is_held(&self) -> Result<bool, LockError> {
        Ok(*self.held()?)
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let held = self.held()?;
        let mut held = self
            .released
            .wait_while(held, |held| *held)
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        *held = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut held = self.held()?;
        if *held {
            Ok(false)
        } else {
            *held = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self
            .held
            .lock()
            .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        if std::mem::replace(&mut *held, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}

/// Lazily creates one `InMemoryLock` per ledger key.
///
/// An entry is dropped on [`LockManager::release`] once nobody holds the
/// lock or waits on it, so the map only holds keys with work in flight.
#[derive(Default)]
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn locks(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<InMemoryLock>>>, LockError> {
        self.locks
            .lock()
            .map_err(|_| LockError::Poisoned("key lock map poisoned".into()))
    }

    /// Number of keys with a lock allocated.
    pub fn len(&self) -> Result<usize, LockError> {
        Ok(self.locks()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LockError> {
        Ok(self.len()? == 0)
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self.locks()?;
        Ok(Arc::clone(locks.entry(key.to_owned()).or_default()))
    }

    fn release(&self, key: &str) -> Result<(), LockError> {
        let mut locks = self.locks()?;
        let idle = match locks.get(key) {
            Some(lock) => Arc::strong_count(lock) == 1 && !lock.is_held()?,
            None => false,
        };
        if idle {
            locks.remove(key);
        }
        Ok(())
    }
}

use std::sync::Arc;

use super::{Lock, LockError};

/// Factory for per-key locks.
///
/// The settlement store asks the manager for the lock of every key it is
/// about to read-modify-write.
pub trait LockManager: Send + Sync {
    /// The concrete lock type handed out by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for `key`.
    ///
    /// Repeated calls with the same key must return the same logical lock.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Called after the caller has unlocked and dropped its handle for `key`.
    /// Managers that allocate per-key state free it here once the lock is idle.
    fn release(&self, key: &str) -> Result<(), LockError> {
        let _ = key;
        Ok(())
    }
}

use super::LockError;

/// Mutual exclusion for one ledger key.
///
/// Not tied to a guarded value the way `std::sync::Mutex` is: the store holds
/// it across a `get` and the following `put`, and [`LockGuard`](super::LockGuard)
/// releases it.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Acquire the lock only if it is free. `Ok(false)` means someone holds it.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock. Releasing a free lock is a no-op.
    fn unlock(&self) -> Result<(), LockError>;
}

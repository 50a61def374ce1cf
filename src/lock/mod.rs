//! Per-key locks used to serialize read-modify-write cycles on one ledger key.
//!
//! Locks are process-local: they serialize merges issued through the same
//! `LockManager`, not writers in other processes sharing the ledger. Use the
//! optimistic merge strategy when the ledger is shared across processes.

mod error;
mod guard;
mod in_memory;
mod lock;
mod lock_manager;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::Lock;
pub use lock_manager::LockManager;

/// Failures reported by a [`Ledger`](super::Ledger) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger could not be reached or refused the call.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
    /// A compare-and-swap found a different value than expected.
    #[error("compare-and-swap conflict on {key}")]
    Conflict { key: String },
    /// The ledger does not offer the requested capability.
    #[error("ledger does not support {0}")]
    Unsupported(&'static str),
    /// An in-process lock guarding the ledger was poisoned.
    #[error("ledger lock poisoned during {0}")]
    Poisoned(&'static str),
}

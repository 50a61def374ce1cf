use crate::ledger::LedgerError;
use crate::lock::LockError;

/// Errors surfaced by the settlement engine and its invocation surface.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// Wrong argument count, empty identifier, or unknown operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The caller-supplied payload does not deserialize into the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
    /// A value already stored in the ledger could not be decoded.
    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
    /// A record could not be encoded for storage.
    #[error("encode error: {0}")]
    Encode(String),
    /// Accumulating a delta would take a running total out of the decimal range.
    #[error("{field} of {id} would overflow")]
    Overflow { id: String, field: &'static str },
    /// The stored value changed between read and write.
    #[error("concurrent update detected on {key}; retry the operation")]
    Conflict { key: String },
    /// The ledger failed a get, put, or delete.
    #[error("underlying store error: {0}")]
    Store(#[source] LedgerError),
    #[error("key lock error: {0}")]
    Lock(#[from] LockError),
}

impl From<LedgerError> for SettlementError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Conflict { key } => SettlementError::Conflict { key },
            other => SettlementError::Store(other),
        }
    }
}

impl From<serde_json::Error> for SettlementError {
    fn from(err: serde_json::Error) -> Self {
        SettlementError::Parse(err.to_string())
    }
}

impl SettlementError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            SettlementError::InvalidArgument(_) => 400,
            SettlementError::Parse(_) => 400,
            SettlementError::Corrupt { .. } => 500,
            SettlementError::Encode(_) => 500,
            SettlementError::Overflow { .. } => 422,
            SettlementError::Conflict { .. } => 409,
            SettlementError::Store(LedgerError::Unavailable(_)) => 503,
            SettlementError::Store(_) => 500,
            SettlementError::Lock(_) => 500,
        }
    }

    /// True when the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SettlementError::Conflict { .. } | SettlementError::Store(LedgerError::Unavailable(_))
        )
    }
}

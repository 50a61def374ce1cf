//! Records persisted by the engine.
//!
//! Both record kinds are JSON documents with camelCase field names. Inputs
//! produced by older partner integrations use PascalCase names
//! (`ROCReferenceNumber`, `ISOCurrency`, ...); those are accepted as aliases.
//! Amounts are exact decimals and are written as JSON strings.

mod summary;
mod transaction;

use serde::{de::DeserializeOwned, Serialize};

use crate::keys::KeySpace;

pub use summary::{SettlementDelta, SettlementSummary};
pub use transaction::{ConversionRateInfo, TransactionRecord};

/// A record stored in the ledger under a caller-supplied business identifier.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The key space this record kind lives in.
    const SPACE: KeySpace;

    /// The business identifier the record is stored under.
    fn id(&self) -> &str;
}

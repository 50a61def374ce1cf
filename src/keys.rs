//! Ledger key layout for the two record kinds.
//!
//! Transaction records and settlement summaries share one flat ledger
//! namespace. The default `Namespaced` layout stores them as
//! `"txn:<rocReferenceNumber>"` and `"summary:<summarySettlementId>"` so a
//! caller reusing one identifier in both domains cannot overwrite the other
//! record. `Flat` stores raw identifiers, matching ledgers populated by
//! earlier deployments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SettlementError;

/// Which record kind a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySpace {
    Transaction,
    Summary,
}

impl KeySpace {
    /// Key prefix used by the namespaced layout.
    pub fn prefix(self) -> &'static str {
        match self {
            KeySpace::Transaction => "txn",
            KeySpace::Summary => "summary",
        }
    }
}

impl fmt::Display for KeySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpace::Transaction => write!(f, "transaction"),
            KeySpace::Summary => write!(f, "settlement summary"),
        }
    }
}

/// How business identifiers map onto ledger keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    #[default]
    Namespaced,
    Flat,
}

impl KeyLayout {
    /// Build the ledger key for `id` in `space`.
    ///
    /// Rejects an empty identifier before any ledger access.
    pub fn key(self, space: KeySpace, id: &str) -> Result<String, SettlementError> {
        if id.is_empty() {
            return Err(SettlementError::InvalidArgument(format!(
                "{} id must not be empty",
                space
            )));
        }
        Ok(match self {
            KeyLayout::Namespaced => format!("{}:{}", space.prefix(), id),
            KeyLayout::Flat => id.to_string(),
        })
    }
}

//! Get-or-create merge primitives shared by the recorder and the aggregator.

use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::model::Record;

/// A record that is built from, and then accumulates, a stream of deltas.
pub trait Mergeable: Record {
    /// One incremental posting.
    type Delta;

    /// The identifier the delta addresses.
    fn delta_id(delta: &Self::Delta) -> &str;

    /// Base case: the record created by the first delta for an id.
    fn create(delta: &Self::Delta) -> Self;

    /// Fold a delta into an existing record. An error aborts the merge
    /// before anything is written.
    fn merge(self, delta: &Self::Delta) -> Result<Self, SettlementError>;
}

/// How a read-modify-write cycle on one key is protected against
/// concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Hold a per-key lock across read and write. Works on any ledger, but
    /// only serializes writers sharing the same lock manager.
    #[default]
    Locked,
    /// Write with compare-and-swap against the bytes that were read. A
    /// concurrent change fails the merge with `SettlementError::Conflict`
    /// and the caller retries. Requires ledger compare-and-swap support.
    Optimistic,
}

/// Result of a get-or-create merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome<T> {
    /// No record existed; it was created from the delta.
    Created(T),
    /// The delta was folded into an existing record.
    Merged(T),
}

impl<T> MergeOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            MergeOutcome::Created(value) | MergeOutcome::Merged(value) => value,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            MergeOutcome::Created(value) | MergeOutcome::Merged(value) => value,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, MergeOutcome::Created(_))
    }
}

/// Result of a create-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The key was absent and the new value was stored.
    Created,
    /// The key already existed; its stored bytes were re-affirmed unchanged.
    AlreadyExists,
}

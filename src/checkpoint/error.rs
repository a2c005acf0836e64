//! Checkpoint error types.

use crate::core::{BeatId, CatalogError};
use thiserror::Error;

/// Errors that can occur while encoding, storing or restoring a snapshot
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Reading or writing the backing store failed
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot references a beat the catalog does not hold
    #[error("Snapshot references an unknown beat: {0}")]
    UnknownBeat(#[from] CatalogError),

    /// Snapshot decoded but its bookkeeping does not match its path
    #[error("Snapshot validation failed: {0:?}")]
    ValidationFailed(Vec<SnapshotIssue>),
}

impl CheckpointError {
    /// Whether the snapshot proves the stored data is corrupt beyond a
    /// fresh start, as opposed to merely unreadable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownBeat(_))
    }
}

/// A single problem found while validating a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotIssue {
    #[error("beat {0} is not in the catalog")]
    UnknownBeat(BeatId),

    #[error("beat {beat} recorded {recorded} times but occurs {actual} times in the path")]
    CountMismatch {
        beat: BeatId,
        recorded: u32,
        actual: u32,
    },
}

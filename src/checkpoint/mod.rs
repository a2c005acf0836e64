//! Snapshot and restore of traversal state.
//!
//! A [`Snapshot`] is the persisted shape of a [`StoryContext`]:
//!
//! ```json
//! { "path": [2, 3], "repeatCounts": { "2": 1, "3": 1 }, "gateReached": false }
//! ```
//!
//! Snapshots carry no version field. Restoring validates the snapshot
//! against the catalog and reports every problem at once.

use crate::core::{BeatId, Catalog, CatalogError, StoryContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;
pub mod store;

pub use error::{CheckpointError, SnapshotIssue};
pub use store::{ContextStore, FileStore, MemoryStore};

/// Serializable form of a [`StoryContext`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Beat ids, traversal order
    pub path: Vec<BeatId>,

    /// Occurrence count per beat id
    pub repeat_counts: BTreeMap<BeatId, u32>,

    /// Whether the gate beat has been reached
    pub gate_reached: bool,
}

impl From<&StoryContext> for Snapshot {
    fn from(ctx: &StoryContext) -> Self {
        Self {
            path: ctx.path().to_vec(),
            repeat_counts: ctx.repeat_counts().clone(),
            gate_reached: ctx.gate_reached(),
        }
    }
}

impl Snapshot {
    /// Check the snapshot against `catalog`, accumulating ALL issues.
    pub fn validate(&self, catalog: &Catalog) -> Validation<(), NonEmptyVec<SnapshotIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<SnapshotIssue>>> = Vec::new();

        let referenced: BTreeSet<BeatId> = self
            .path
            .iter()
            .chain(self.repeat_counts.keys())
            .copied()
            .collect();

        for &id in &referenced {
            let check = if catalog.contains(id) {
                Validation::success(())
            } else {
                Validation::fail(SnapshotIssue::UnknownBeat(id))
            };
            checks.push(check);
        }

        let derived = StoryContext::from_path(self.path.clone(), self.gate_reached);
        for &id in &referenced {
            let recorded = self.repeat_counts.get(&id).copied().unwrap_or(0);
            let actual = derived.occurrences(id);
            let check = if recorded == actual {
                Validation::success(())
            } else {
                Validation::fail(SnapshotIssue::CountMismatch {
                    beat: id,
                    recorded,
                    actual,
                })
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Rebuild the context this snapshot was taken from.
    ///
    /// An id outside the catalog yields [`CheckpointError::UnknownBeat`],
    /// which callers must treat as fatal. Any other issue yields
    /// [`CheckpointError::ValidationFailed`]. The gate flag is restored as
    /// stored, not recomputed.
    pub fn restore(self, catalog: &Catalog) -> Result<StoryContext, CheckpointError> {
        match self.validate(catalog) {
            Validation::Success(_) => Ok(StoryContext::from_path(self.path, self.gate_reached)),
            Validation::Failure(errors) => {
                let issues: Vec<SnapshotIssue> = errors.iter().cloned().collect();
                let unknown = issues.iter().find_map(|issue| match issue {
                    SnapshotIssue::UnknownBeat(id) => Some(*id),
                    SnapshotIssue::CountMismatch { .. } => None,
                });
                match unknown {
                    Some(id) => Err(CatalogError::NotFound(id).into()),
                    None => Err(CheckpointError::ValidationFailed(issues)),
                }
            }
        }
    }
}

/// Wire format for encoded snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Human-readable JSON, the shape shown in the module docs
    #[default]
    Json,

    /// Compact bincode encoding
    Binary,
}

impl SnapshotFormat {
    pub fn encode(self, snapshot: &Snapshot) -> Result<Vec<u8>, CheckpointError> {
        match self {
            Self::Json => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| CheckpointError::SerializationFailed(e.to_string())),
            Self::Binary => bincode::serialize(snapshot)
                .map_err(|e| CheckpointError::SerializationFailed(e.to_string())),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<Snapshot, CheckpointError> {
        match self {
            Self::Json => serde_json::from_slice(bytes)
                .map_err(|e| CheckpointError::DeserializationFailed(e.to_string())),
            Self::Binary => bincode::deserialize(bytes)
                .map_err(|e| CheckpointError::DeserializationFailed(e.to_string())),
        }
    }
}

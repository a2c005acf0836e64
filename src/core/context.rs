//! Traversal state.
//!
//! `StoryContext` is a plain value. Every transition produces a fresh
//! context; nothing mutates one in place once it has been handed out.

use super::beat::BeatId;
use super::catalog::GATE_BEAT;
use std::collections::BTreeMap;

/// The engine's only state: the visited path plus derived bookkeeping.
///
/// Invariant: `repeat_counts[id]` equals the number of times `id` occurs in
/// `path`, and ids with zero occurrences have no entry.
///
/// # Example
///
/// ```rust
/// use beatpath::core::StoryContext;
///
/// let ctx = StoryContext::from_path(vec![2, 3, 9, 9], false);
///
/// assert_eq!(ctx.last(), Some(9));
/// assert_eq!(ctx.occurrences(9), 2);
/// assert_eq!(ctx.occurrences(4), 0);
/// assert!(ctx.is_consistent());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryContext {
    path: Vec<BeatId>,
    repeat_counts: BTreeMap<BeatId, u32>,
    gate_reached: bool,
}

impl StoryContext {
    /// The session-start context: empty path, gate not reached.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from an explicit path, deriving repeat counts.
    ///
    /// `gate_reached` is taken as given, not recomputed.
    pub fn from_path(path: Vec<BeatId>, gate_reached: bool) -> Self {
        let repeat_counts = count_occurrences(&path);
        Self {
            path,
            repeat_counts,
            gate_reached,
        }
    }

    /// Visited beats, traversal order.
    pub fn path(&self) -> &[BeatId] {
        &self.path
    }

    pub fn repeat_counts(&self) -> &BTreeMap<BeatId, u32> {
        &self.repeat_counts
    }

    /// Whether the funnel beat has been reached.
    pub fn gate_reached(&self) -> bool {
        self.gate_reached
    }

    /// Most recently visited beat.
    pub fn last(&self) -> Option<BeatId> {
        self.path.last().copied()
    }

    /// Number of times `id` occurs in the path. O(log n).
    pub fn occurrences(&self, id: BeatId) -> u32 {
        self.repeat_counts.get(&id).copied().unwrap_or(0)
    }

    /// Whether `id` occurs anywhere in the path.
    pub fn contains(&self, id: BeatId) -> bool {
        self.occurrences(id) > 0
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Check the repeat-count invariant against the path.
    pub fn is_consistent(&self) -> bool {
        count_occurrences(&self.path) == self.repeat_counts
    }

    /// Append `id`, returning a new context.
    ///
    /// The gate flag is sticky here: it is set when `id` is the gate and
    /// otherwise carried over unchanged.
    pub(crate) fn record(&self, id: BeatId) -> Self {
        let mut path = self.path.clone();
        path.push(id);

        let mut repeat_counts = self.repeat_counts.clone();
        *repeat_counts.entry(id).or_insert(0) += 1;

        Self {
            path,
            repeat_counts,
            gate_reached: self.gate_reached || id == GATE_BEAT,
        }
    }

    /// Drop the last beat, returning the new context and the removed id.
    ///
    /// Unlike [`record`](Self::record), the gate flag is recomputed from the
    /// truncated path, so retracting the gate clears it.
    pub(crate) fn retract(&self) -> Option<(Self, BeatId)> {
        let (&last, rest) = self.path.split_last()?;
        let path = rest.to_vec();

        let mut repeat_counts = self.repeat_counts.clone();
        if let Some(count) = repeat_counts.get_mut(&last) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                repeat_counts.remove(&last);
            }
        }

        let gate_reached = path.contains(&GATE_BEAT);
        Some((
            Self {
                path,
                repeat_counts,
                gate_reached,
            },
            last,
        ))
    }
}

fn count_occurrences(path: &[BeatId]) -> BTreeMap<BeatId, u32> {
    let mut counts = BTreeMap::new();
    for &id in path {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

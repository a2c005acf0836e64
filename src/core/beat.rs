//! Beat records.
//!
//! A beat is an immutable catalog entry. Beats are built in `const`
//! context so the catalog can live in a `static`.

use super::step::CoreStep;
use serde::Serialize;

/// Stable beat identifier. Also the catalog's total order.
pub type BeatId = u32;

/// One narrative checkpoint.
///
/// # Example
///
/// ```rust
/// use beatpath::core::{Beat, CoreStep};
///
/// const REVELATION: Beat = Beat::new(9, "1st Revelation", CoreStep::Desire)
///     .repeatable(Some(3))
///     .in_family("revelation");
///
/// assert!(REVELATION.repeatable);
/// assert!(REVELATION.allows_occurrence(2));
/// assert!(!REVELATION.allows_occurrence(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    /// Catalog id, `1..=n`
    pub id: BeatId,
    /// Display label
    pub label: &'static str,
    /// Host core step
    pub step: CoreStep,
    /// Whether the beat may recur in a path
    pub repeatable: bool,
    /// Cap on occurrences; `None` means unbounded when repeatable
    pub max_repeats: Option<u32>,
    /// Grouping tag for related repeatable beats. Not read by any rule.
    pub family_id: Option<&'static str>,
    /// Beats that must already appear somewhere in the path
    pub preconditions: &'static [BeatId],
}

impl Beat {
    /// A non-repeatable beat with no preconditions.
    pub const fn new(id: BeatId, label: &'static str, step: CoreStep) -> Self {
        Self {
            id,
            label,
            step,
            repeatable: false,
            max_repeats: None,
            family_id: None,
            preconditions: &[],
        }
    }

    /// Mark the beat repeatable, optionally capped at `max_repeats` occurrences.
    pub const fn repeatable(self, max_repeats: Option<u32>) -> Self {
        Self {
            repeatable: true,
            max_repeats,
            ..self
        }
    }

    pub const fn in_family(self, family_id: &'static str) -> Self {
        Self {
            family_id: Some(family_id),
            ..self
        }
    }

    /// Require every id in `ids` to be present in the path first.
    pub const fn requires(self, ids: &'static [BeatId]) -> Self {
        Self {
            preconditions: ids,
            ..self
        }
    }

    /// Whether a path already holding `count` occurrences of this beat may
    /// take one more.
    pub fn allows_occurrence(&self, count: u32) -> bool {
        if !self.repeatable && count > 0 {
            return false;
        }
        match self.max_repeats {
            Some(max) => count < max,
            None => true,
        }
    }
}

//! Transition outcomes.

use crate::core::{BeatId, StoryContext, Violation};
use thiserror::Error;

/// Why an advance or undo left the context untouched.
///
/// Rejections are expected outcomes, not failures: the caller keeps its
/// current context and may tell the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Cannot advance to beat {beat}: {violation}")]
    Illegal { beat: BeatId, violation: Violation },

    #[error("Nothing to undo")]
    EmptyPath,

    #[error("Cannot undo to index {index}: path holds {len} beats")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result of applying an operation to a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The operation succeeded; replace the old context with this one.
    Applied(StoryContext),

    /// The operation was refused and the old context stands.
    Rejected(Rejection),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The new context, if the operation was applied.
    pub fn applied(self) -> Option<StoryContext> {
        match self {
            Self::Applied(ctx) => Some(ctx),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }

    /// The context a caller should hold after this transition: the new one
    /// if applied, otherwise `current` unchanged.
    pub fn resolve(self, current: StoryContext) -> StoryContext {
        self.applied().unwrap_or(current)
    }
}

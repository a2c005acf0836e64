//! Traversal engine.
//!
//! The engine applies `advance` and `undo` to a [`StoryContext`] and returns
//! a [`Transition`]. It holds no context of its own; callers keep the
//! current context and swap in the applied one.

mod transition;

pub use transition::{Rejection, Transition};

use crate::core::{
    Beat, BeatId, Catalog, CatalogError, CoreStep, StoryContext, TransitionGuard, Verdict,
    DEFAULT_BEAT,
};
use std::collections::BTreeSet;

/// Pure transition functions over a catalog.
///
/// # Example
///
/// ```rust
/// use beatpath::core::StoryContext;
/// use beatpath::engine::{Engine, Transition};
///
/// let engine = Engine::standard();
/// let mut ctx = StoryContext::empty();
///
/// for beat in [2, 3, 4] {
///     ctx = engine.advance(&ctx, beat)?.resolve(ctx);
/// }
/// assert_eq!(ctx.path(), &[2, 3, 4]);
///
/// // Beat 4 is single-use, so a second visit is refused.
/// assert!(!engine.advance(&ctx, 4)?.is_applied());
///
/// let ctx = engine.undo(&ctx).resolve(ctx);
/// assert_eq!(ctx.path(), &[2, 3]);
/// # Ok::<(), beatpath::core::CatalogError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    guard: TransitionGuard,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            guard: TransitionGuard::new(catalog),
        }
    }

    /// Engine over the standard 22-beat catalog.
    pub fn standard() -> Self {
        Self::new(Catalog::standard())
    }

    pub fn catalog(&self) -> Catalog {
        self.guard.catalog()
    }

    pub fn guard(&self) -> &TransitionGuard {
        &self.guard
    }

    pub fn is_legal(&self, ctx: &StoryContext, beat: BeatId) -> Result<bool, CatalogError> {
        self.guard.is_legal(ctx, beat)
    }

    pub fn legal_successors(&self, ctx: &StoryContext) -> Result<Vec<&'static Beat>, CatalogError> {
        self.guard.legal_successors(ctx)
    }

    /// Append `beat` to the path.
    ///
    /// The guard is re-checked here; an illegal move is returned as
    /// [`Rejection::Illegal`] and `ctx` is not touched.
    pub fn advance(&self, ctx: &StoryContext, beat: BeatId) -> Result<Transition, CatalogError> {
        match self.guard.check(ctx, beat)? {
            Verdict::Allowed => Ok(Transition::Applied(ctx.record(beat))),
            Verdict::Denied(violation) => Ok(Transition::Rejected(Rejection::Illegal {
                beat,
                violation,
            })),
        }
    }

    /// Remove the most recent beat.
    ///
    /// The gate flag is recomputed from the shortened path, so undoing the
    /// gate lifts the funnel lock even though advancing never clears it.
    pub fn undo(&self, ctx: &StoryContext) -> Transition {
        match ctx.retract() {
            Some((prev, _)) => Transition::Applied(prev),
            None => Transition::Rejected(Rejection::EmptyPath),
        }
    }

    /// Undo repeatedly until the path holds exactly `index` beats, removing
    /// the beat at `index` and everything after it.
    pub fn undo_to(&self, ctx: &StoryContext, index: usize) -> Transition {
        if index >= ctx.len() {
            return Transition::Rejected(Rejection::IndexOutOfRange {
                index,
                len: ctx.len(),
            });
        }

        let mut current = ctx.clone();
        while current.len() > index {
            match current.retract() {
                Some((prev, _)) => current = prev,
                None => break,
            }
        }
        Transition::Applied(current)
    }

    /// The beat the traversal is standing on, or the default opening beat
    /// when the path is empty.
    pub fn current_beat(&self, ctx: &StoryContext) -> Result<&'static Beat, CatalogError> {
        self.catalog().beat(ctx.last().unwrap_or(DEFAULT_BEAT))
    }

    /// Core steps with at least one visited beat.
    pub fn fulfilled_steps(&self, ctx: &StoryContext) -> Result<BTreeSet<CoreStep>, CatalogError> {
        let catalog = self.catalog();
        ctx.repeat_counts()
            .keys()
            .map(|&id| catalog.beat(id).map(|beat| beat.step))
            .collect()
    }

    /// Whether no beat may follow the current path.
    pub fn is_complete(&self, ctx: &StoryContext) -> Result<bool, CatalogError> {
        Ok(self.legal_successors(ctx)?.is_empty())
    }
}

//! Transition guard.
//!
//! Decides whether a beat may be appended to a context's path. The guard
//! is pure: it reads the catalog and the context and never mutates either.
//!
//! Four rules must all hold, evaluated in this order:
//!
//! 1. **Funnel lock**: once the gate is reached only beats `>= FUNNEL_FLOOR`
//!    are reachable.
//! 2. **Step order**: the target's core step may not rank below the step of
//!    the last visited beat.
//! 3. **Repeat budget**: single-use beats occur once; capped beats occur at
//!    most `max_repeats` times.
//! 4. **Preconditions**: every listed beat must already be somewhere in the
//!    path.

use super::beat::{Beat, BeatId};
use super::catalog::{Catalog, FUNNEL_FLOOR};
use super::context::StoryContext;
use super::error::CatalogError;
use super::step::CoreStep;
use thiserror::Error;

/// The rule that rejected a candidate beat.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("Gate reached: beat {beat} is below the funnel floor {floor}")]
    FunnelLocked { beat: BeatId, floor: BeatId },

    #[error("Step regression: cannot move from {current} back to {target}")]
    StepRegression { current: CoreStep, target: CoreStep },

    #[error("Beat {beat} is not repeatable")]
    NotRepeatable { beat: BeatId },

    #[error("Beat {beat} already used its {max} repeats")]
    RepeatBudgetExhausted { beat: BeatId, max: u32 },

    #[error("Beat {beat} requires beats {missing:?} first")]
    MissingPreconditions { beat: BeatId, missing: Vec<BeatId> },
}

/// Outcome of a guard check. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(Violation),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Allowed => None,
            Self::Denied(violation) => Some(violation),
        }
    }
}

/// Pure predicate over `(context, target)` pairs, bound to a catalog.
///
/// # Example
///
/// ```rust
/// use beatpath::core::{Catalog, StoryContext, TransitionGuard, Verdict, Violation};
///
/// let guard = TransitionGuard::new(Catalog::standard());
/// let ctx = StoryContext::from_path(vec![2, 3, 4], false);
///
/// assert!(guard.is_legal(&ctx, 5)?);
/// assert_eq!(
///     guard.check(&ctx, 4)?,
///     Verdict::Denied(Violation::NotRepeatable { beat: 4 })
/// );
/// # Ok::<(), beatpath::core::CatalogError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionGuard {
    catalog: Catalog,
}

impl TransitionGuard {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    /// Evaluate every rule for `target`, reporting the first one that fails.
    ///
    /// Fails with [`CatalogError::NotFound`] if `target` or the last beat of
    /// the path is not in the catalog.
    pub fn check(&self, ctx: &StoryContext, target: BeatId) -> Result<Verdict, CatalogError> {
        let beat = self.catalog.beat(target)?;

        if ctx.gate_reached() && target < FUNNEL_FLOOR {
            return Ok(Verdict::Denied(Violation::FunnelLocked {
                beat: target,
                floor: FUNNEL_FLOOR,
            }));
        }

        if let Some(current_id) = ctx.last() {
            let current = self.catalog.beat(current_id)?;
            if beat.step.ordinal() < current.step.ordinal() {
                return Ok(Verdict::Denied(Violation::StepRegression {
                    current: current.step,
                    target: beat.step,
                }));
            }
        }

        if let Some(violation) = repeat_violation(beat, ctx.occurrences(target)) {
            return Ok(Verdict::Denied(violation));
        }

        let missing: Vec<BeatId> = beat
            .preconditions
            .iter()
            .copied()
            .filter(|id| !ctx.contains(*id))
            .collect();
        if !missing.is_empty() {
            return Ok(Verdict::Denied(Violation::MissingPreconditions {
                beat: target,
                missing,
            }));
        }

        Ok(Verdict::Allowed)
    }

    /// Strict boolean form of [`check`](Self::check).
    pub fn is_legal(&self, ctx: &StoryContext, target: BeatId) -> Result<bool, CatalogError> {
        Ok(self.check(ctx, target)?.is_allowed())
    }

    /// Every beat the guard allows next, in catalog order.
    ///
    /// An empty result is a dead end: nothing may follow the current path.
    pub fn legal_successors(&self, ctx: &StoryContext) -> Result<Vec<&'static Beat>, CatalogError> {
        let mut successors = Vec::new();
        for beat in self.catalog.beats() {
            if self.is_legal(ctx, beat.id)? {
                successors.push(beat);
            }
        }
        Ok(successors)
    }
}

fn repeat_violation(beat: &Beat, count: u32) -> Option<Violation> {
    if beat.allows_occurrence(count) {
        return None;
    }
    match beat.max_repeats {
        Some(max) if beat.repeatable => Some(Violation::RepeatBudgetExhausted { beat: beat.id, max }),
        _ => Some(Violation::NotRepeatable { beat: beat.id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::GATE_BEAT;

    static GUARDED: [Beat; 5] = [
        Beat::new(1, "Opening", CoreStep::WeaknessNeed),
        Beat::new(2, "Ghost", CoreStep::WeaknessNeed),
        Beat::new(3, "Want", CoreStep::Desire),
        Beat::new(4, "Inciting", CoreStep::Desire),
        Beat::new(5, "Payoff", CoreStep::Desire).requires(&[4]),
    ];

    fn standard() -> TransitionGuard {
        TransitionGuard::new(Catalog::standard())
    }

    fn guarded() -> TransitionGuard {
        TransitionGuard::new(Catalog::from_static(&GUARDED).unwrap())
    }

    #[test]
    fn empty_context_allows_any_unconstrained_beat() {
        let guard = standard();
        let ctx = StoryContext::empty();

        for id in 1..=22 {
            assert!(guard.is_legal(&ctx, id).unwrap(), "beat {id} should be legal");
        }
    }

    #[test]
    fn funnel_lock_rejects_below_floor() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![2, 3, 4, 5, 7, 10, 12, 13, 14, 16, GATE_BEAT], true);

        assert_eq!(
            guard.check(&ctx, 7).unwrap(),
            Verdict::Denied(Violation::FunnelLocked { beat: 7, floor: 19 })
        );
        assert!(guard.is_legal(&ctx, 19).unwrap());
    }

    #[test]
    fn funnel_lock_follows_flag_not_path() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![16], true);

        assert!(!guard.is_legal(&ctx, 18).unwrap());
        assert!(guard.is_legal(&ctx, 19).unwrap());
    }

    #[test]
    fn step_regression_is_rejected() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![2, 10], false);

        assert_eq!(
            guard.check(&ctx, 7).unwrap(),
            Verdict::Denied(Violation::StepRegression {
                current: CoreStep::Plan,
                target: CoreStep::Opponent,
            })
        );
    }

    #[test]
    fn same_step_is_allowed() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![4], false);

        assert!(guard.is_legal(&ctx, 9).unwrap());
        assert!(guard.is_legal(&ctx, 5).unwrap());
    }

    #[test]
    fn single_use_beat_cannot_repeat() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![4], false);

        assert_eq!(
            guard.check(&ctx, 4).unwrap(),
            Verdict::Denied(Violation::NotRepeatable { beat: 4 })
        );
    }

    #[test]
    fn capped_beat_stops_after_max() {
        let guard = standard();

        let ctx = StoryContext::from_path(vec![9, 9], false);
        assert!(guard.is_legal(&ctx, 9).unwrap());

        let ctx = StoryContext::from_path(vec![9, 9, 9], false);
        assert_eq!(
            guard.check(&ctx, 9).unwrap(),
            Verdict::Denied(Violation::RepeatBudgetExhausted { beat: 9, max: 3 })
        );
    }

    #[test]
    fn unbounded_beat_keeps_repeating() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![15; 10], false);

        assert!(guard.is_legal(&ctx, 15).unwrap());
    }

    #[test]
    fn preconditions_require_membership() {
        let guard = guarded();

        assert_eq!(
            guard.check(&StoryContext::empty(), 5).unwrap(),
            Verdict::Denied(Violation::MissingPreconditions {
                beat: 5,
                missing: vec![4],
            })
        );

        let ctx = StoryContext::from_path(vec![4, 3], false);
        assert!(guard.is_legal(&ctx, 5).unwrap());
    }

    #[test]
    fn unknown_target_is_not_found() {
        let guard = standard();

        assert_eq!(
            guard.check(&StoryContext::empty(), 23),
            Err(CatalogError::NotFound(23))
        );
    }

    #[test]
    fn unknown_current_beat_is_not_found() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![2, 40], false);

        assert_eq!(guard.check(&ctx, 3), Err(CatalogError::NotFound(40)));
        assert!(guard.legal_successors(&ctx).is_err());
    }

    #[test]
    fn guard_is_deterministic_and_pure() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![2, 3, 9], false);
        let before = ctx.clone();

        let first = guard.check(&ctx, 9).unwrap();
        let second = guard.check(&ctx, 9).unwrap();

        assert_eq!(first, second);
        assert_eq!(ctx, before);
    }

    #[test]
    fn successors_preserve_catalog_order() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![19], false);

        let ids: Vec<BeatId> = guard
            .legal_successors(&ctx)
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();

        assert_eq!(ids, vec![1, 16, 18, 20, 21, 22]);
    }

    #[test]
    fn successors_are_empty_at_the_end() {
        let guard = standard();
        let ctx = StoryContext::from_path(vec![18, 19, 20, 21, 22], true);

        assert!(guard.legal_successors(&ctx).unwrap().is_empty());
    }

    #[test]
    fn violation_messages_are_readable() {
        let violation = Violation::FunnelLocked { beat: 7, floor: 19 };
        assert_eq!(
            violation.to_string(),
            "Gate reached: beat 7 is below the funnel floor 19"
        );
    }
}

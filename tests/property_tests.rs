//! Property-based tests for the traversal engine.
//!
//! These tests use proptest to drive random walks of advances and undos
//! and check that the invariants hold at every step.

use beatpath::checkpoint::{Snapshot, SnapshotFormat};
use beatpath::core::{Catalog, StoryContext, GATE_BEAT};
use beatpath::engine::Engine;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    /// Advance to the n-th legal successor, modulo the successor count
    Advance(usize),
    Undo,
}

prop_compose! {
    fn arbitrary_op()(undo in prop::bool::weighted(0.2), pick in 0..32usize) -> Op {
        if undo { Op::Undo } else { Op::Advance(pick) }
    }
}

/// Apply `ops`, returning every context visited along the way.
fn run(engine: &Engine, ops: &[Op]) -> Vec<StoryContext> {
    let mut contexts = vec![StoryContext::empty()];
    let mut ctx = StoryContext::empty();

    for op in ops {
        ctx = match op {
            Op::Advance(pick) => {
                let successors = engine.legal_successors(&ctx).unwrap();
                if successors.is_empty() {
                    continue;
                }
                let beat = successors[pick % successors.len()].id;
                engine.advance(&ctx, beat).unwrap().resolve(ctx)
            }
            Op::Undo => engine.undo(&ctx).resolve(ctx),
        };
        contexts.push(ctx.clone());
    }
    contexts
}

proptest! {
    #[test]
    fn guard_is_pure(ops in prop::collection::vec(arbitrary_op(), 0..30), target in 1..=22u32) {
        let engine = Engine::standard();
        let ctx = run(&engine, &ops).pop().unwrap();
        let before = ctx.clone();

        let first = engine.guard().check(&ctx, target).unwrap();
        let second = engine.guard().check(&ctx, target).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(ctx, before);
    }

    #[test]
    fn paths_never_regress_a_step(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let engine = Engine::standard();
        let catalog = Catalog::standard();

        for ctx in run(&engine, &ops) {
            for pair in ctx.path().windows(2) {
                let prev = catalog.beat(pair[0]).unwrap().step.ordinal();
                let next = catalog.beat(pair[1]).unwrap().step.ordinal();
                prop_assert!(next >= prev);
            }
        }
    }

    #[test]
    fn counts_track_path(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let engine = Engine::standard();

        for ctx in run(&engine, &ops) {
            prop_assert!(ctx.is_consistent());
        }
    }

    #[test]
    fn repeat_budgets_hold(ops in prop::collection::vec(arbitrary_op(), 0..60)) {
        let engine = Engine::standard();
        let catalog = Catalog::standard();

        for ctx in run(&engine, &ops) {
            for beat in catalog.beats() {
                let count = ctx.occurrences(beat.id);
                if !beat.repeatable {
                    prop_assert!(count <= 1);
                }
                if let Some(max) = beat.max_repeats {
                    prop_assert!(count <= max);
                }
            }
        }
    }

    #[test]
    fn gate_flag_matches_gate_presence(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let engine = Engine::standard();

        for ctx in run(&engine, &ops) {
            prop_assert_eq!(ctx.gate_reached(), ctx.contains(GATE_BEAT));
        }
    }

    #[test]
    fn successors_are_exactly_the_legal_beats(ops in prop::collection::vec(arbitrary_op(), 0..30)) {
        let engine = Engine::standard();
        let ctx = run(&engine, &ops).pop().unwrap();

        let successors: Vec<u32> = engine
            .legal_successors(&ctx)
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        let expected: Vec<u32> = (1..=22)
            .filter(|&id| engine.is_legal(&ctx, id).unwrap())
            .collect();

        prop_assert_eq!(successors, expected);
    }

    #[test]
    fn snapshot_roundtrip(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let engine = Engine::standard();
        let ctx = run(&engine, &ops).pop().unwrap();

        let json = SnapshotFormat::Json.encode(&Snapshot::from(&ctx)).unwrap();
        let restored = SnapshotFormat::Json
            .decode(&json)
            .unwrap()
            .restore(&engine.catalog())
            .unwrap();

        prop_assert_eq!(restored, ctx);
    }

    #[test]
    fn undo_reverts_advance(ops in prop::collection::vec(arbitrary_op(), 0..30), pick in 0..32usize) {
        let engine = Engine::standard();
        let ctx = run(&engine, &ops).pop().unwrap();
        let successors = engine.legal_successors(&ctx).unwrap();
        prop_assume!(!successors.is_empty());

        let beat = successors[pick % successors.len()].id;
        let advanced = engine.advance(&ctx, beat).unwrap().applied().unwrap();
        let undone = engine.undo(&advanced).applied().unwrap();

        prop_assert_eq!(undone, ctx);
    }
}

//! Core traversal types and logic.
//!
//! This module contains the pure functional core of the engine:
//! - The beat catalog and core step ranking
//! - The `StoryContext` value
//! - The transition guard and successor enumeration
//!
//! Nothing in this module performs I/O or logs.

mod beat;
mod catalog;
mod context;
mod error;
mod guard;
mod step;

pub use beat::{Beat, BeatId};
pub use catalog::{Catalog, DEFAULT_BEAT, FUNNEL_FLOOR, GATE_BEAT};
pub use context::StoryContext;
pub use error::CatalogError;
pub use guard::{TransitionGuard, Verdict, Violation};
pub use step::CoreStep;

//! Beatpath: a pure functional traversal engine for the 22-beat story structure
//!
//! Beatpath walks a fixed catalog of 22 story beats grouped into seven
//! ordered core steps. A pure core decides which beats may come next; an
//! imperative shell owns the current traversal and persists it.
//!
//! # Core Concepts
//!
//! - **Catalog**: the immutable beats and their core steps
//! - **StoryContext**: the visited path, repeat counts and the gate flag
//! - **TransitionGuard**: the pure legality check and successor enumeration
//! - **Engine**: `advance` / `undo` as pure functions over contexts
//! - **StorySession**: owns a context, applies transitions, notifies a store
//!
//! # Example
//!
//! ```rust
//! use beatpath::core::StoryContext;
//! use beatpath::engine::Engine;
//!
//! let engine = Engine::standard();
//! let mut ctx = StoryContext::empty();
//!
//! for beat in [2, 3, 4, 5, 7, 10, 12, 13, 14, 16, 18, 19, 20, 21, 22] {
//!     assert!(engine.is_legal(&ctx, beat)?);
//!     ctx = engine.advance(&ctx, beat)?.resolve(ctx);
//! }
//!
//! assert_eq!(ctx.len(), 15);
//! assert!(ctx.gate_reached());
//! assert!(engine.legal_successors(&ctx)?.is_empty());
//! # Ok::<(), beatpath::core::CatalogError>(())
//! ```

pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod session;

// Re-export commonly used types
pub use crate::checkpoint::{ContextStore, FileStore, MemoryStore, Snapshot, SnapshotFormat};
pub use crate::core::{Beat, BeatId, Catalog, CatalogError, CoreStep, StoryContext, TransitionGuard};
pub use crate::engine::{Engine, Rejection, Transition};
pub use crate::session::{Outcome, SessionError, StorySession};

//! Story sessions.
//!
//! A session is the imperative shell around the pure engine. It owns the
//! authoritative context, swaps in each applied transition, and notifies its
//! store afterwards. Store failures are logged and swallowed: the in-memory
//! context stays authoritative for the rest of the session.

use crate::checkpoint::{CheckpointError, ContextStore, Snapshot};
use crate::core::{Beat, BeatId, CatalogError, CoreStep, StoryContext};
use crate::engine::{Engine, Rejection, Transition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifies one session in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The context references a beat outside the catalog.
    #[error("Story data is corrupt: {0}")]
    Corrupt(#[from] CatalogError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalAction {
    Advanced,
    Undone,
}

/// One applied change, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub action: JournalAction,
    /// The beat appended or removed
    pub beat: BeatId,
    /// Path length after the change
    pub path_len: usize,
    pub at: DateTime<Utc>,
}

/// What a session operation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A single user's walk through the beats, backed by a store.
///
/// Operations are synchronous; callers serialize them.
pub struct StorySession<S: ContextStore> {
    id: SessionId,
    engine: Engine,
    store: S,
    context: StoryContext,
    journal: Vec<JournalEntry>,
    started_at: DateTime<Utc>,
}

impl<S: ContextStore> StorySession<S> {
    /// Open a session, restoring whatever `store` holds.
    ///
    /// An empty, unreadable or inconsistent store starts a fresh context.
    /// A stored path that references a beat outside the catalog is
    /// corrupt and fails with [`SessionError::Corrupt`].
    pub fn open(engine: Engine, store: S) -> Result<Self, SessionError> {
        let id = SessionId::new();
        let context = match store.load() {
            Ok(Some(snapshot)) => match snapshot.restore(&engine.catalog()) {
                Ok(context) => {
                    info!(session_id = %id, path_len = context.len(), "restored story");
                    context
                }
                Err(CheckpointError::UnknownBeat(err)) => {
                    warn!(session_id = %id, error = %err, "stored story references unknown beat");
                    return Err(err.into());
                }
                Err(err) => {
                    warn!(session_id = %id, error = %err, "stored story is inconsistent, starting fresh");
                    StoryContext::empty()
                }
            },
            Ok(None) => {
                debug!(session_id = %id, "no stored story, starting fresh");
                StoryContext::empty()
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "stored story is unreadable, starting fresh");
                StoryContext::empty()
            }
        };

        Ok(Self::with_context(id, engine, store, context))
    }

    /// Start a fresh session without reading `store`.
    pub fn fresh(engine: Engine, store: S) -> Self {
        Self::with_context(SessionId::new(), engine, store, StoryContext::empty())
    }

    fn with_context(id: SessionId, engine: Engine, store: S, context: StoryContext) -> Self {
        Self {
            id,
            engine,
            store,
            context,
            journal: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn context(&self) -> &StoryContext {
        &self.context
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applied changes since the session opened.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_beat(&self) -> Result<&'static Beat, SessionError> {
        Ok(self.engine.current_beat(&self.context)?)
    }

    pub fn legal_successors(&self) -> Result<Vec<&'static Beat>, SessionError> {
        Ok(self.engine.legal_successors(&self.context)?)
    }

    pub fn fulfilled_steps(&self) -> Result<BTreeSet<CoreStep>, SessionError> {
        Ok(self.engine.fulfilled_steps(&self.context)?)
    }

    pub fn is_complete(&self) -> Result<bool, SessionError> {
        Ok(self.engine.is_complete(&self.context)?)
    }

    pub fn advance(&mut self, beat: BeatId) -> Result<Outcome, SessionError> {
        match self.engine.advance(&self.context, beat)? {
            Transition::Applied(next) => {
                self.commit(next, vec![(JournalAction::Advanced, beat)]);
                Ok(Outcome::Applied)
            }
            Transition::Rejected(rejection) => Ok(self.rejected(rejection)),
        }
    }

    pub fn undo(&mut self) -> Outcome {
        let removed = self.context.last();
        match (self.engine.undo(&self.context), removed) {
            (Transition::Applied(next), Some(beat)) => {
                self.commit(next, vec![(JournalAction::Undone, beat)]);
                Outcome::Applied
            }
            (Transition::Applied(_), None) => self.rejected(Rejection::EmptyPath),
            (Transition::Rejected(rejection), _) => self.rejected(rejection),
        }
    }

    /// Cut the path back to `index` beats. Persists once.
    pub fn undo_to(&mut self, index: usize) -> Outcome {
        match self.engine.undo_to(&self.context, index) {
            Transition::Applied(next) => {
                let removed = self.context.path()[index..]
                    .iter()
                    .rev()
                    .map(|&beat| (JournalAction::Undone, beat))
                    .collect();
                self.commit(next, removed);
                Outcome::Applied
            }
            Transition::Rejected(rejection) => self.rejected(rejection),
        }
    }

    fn commit(&mut self, next: StoryContext, changes: Vec<(JournalAction, BeatId)>) {
        let mut path_len = self.context.len();
        let at = Utc::now();
        for (action, beat) in changes {
            path_len = match action {
                JournalAction::Advanced => path_len + 1,
                JournalAction::Undone => path_len.saturating_sub(1),
            };
            debug!(session_id = %self.id, ?action, beat, path_len, "applied transition");
            self.journal.push(JournalEntry {
                action,
                beat,
                path_len,
                at,
            });
        }

        self.context = next;
        self.persist();
    }

    fn rejected(&self, rejection: Rejection) -> Outcome {
        debug!(session_id = %self.id, reason = %rejection, "rejected transition");
        Outcome::Rejected(rejection)
    }

    fn persist(&mut self) {
        let snapshot = Snapshot::from(&self.context);
        if let Err(err) = self.store.save(&snapshot) {
            warn!(
                session_id = %self.id,
                error = %err,
                path_len = self.context.len(),
                "failed to persist story, keeping in-memory context"
            );
        }
    }
}

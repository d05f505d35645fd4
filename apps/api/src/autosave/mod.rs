//! Autosave: turns in-memory edits into durable writes.
//!
//! # Policy
//! - Every change replaces the live document immediately and restarts a 2s
//!   debounce timer. Only the trailing edit of a burst is persisted.
//! - A manual save cancels the pending timer and persists right away.
//! - A timer that fires hands its persist to a detached task, so later edits
//!   restart the timer without cancelling the write already in flight.
//! - Persists are queued behind a FIFO write gate. A queued snapshot without an
//!   id picks up the id from a create that finished ahead of it.
//!
//! One coordinator is bound to one user. Dropping it cancels the pending timer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::resume::ResumeDocument;
use crate::session::notices::Notices;
use crate::store::{ResumeStore, StoreError};

/// Quiet period after the last change before an automatic save fires.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum AutosaveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("session has been closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub resume_id: Uuid,
    /// True when this save inserted the record.
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutosaveStatus {
    /// An automatic save is scheduled and has not fired yet.
    pub pending: bool,
    /// At least one persist has started and not resolved.
    pub saving: bool,
}

pub struct AutosaveCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    user_id: Uuid,
    store: Arc<dyn ResumeStore>,
    notices: Notices,
    state: Mutex<State>,
    in_flight: AtomicUsize,
    write_gate: tokio::sync::Mutex<()>,
}

struct State {
    document: ResumeDocument,
    pending: Option<PendingSave>,
    /// Bumped on every (re)schedule and cancel. A woken timer whose generation
    /// no longer matches is stale.
    generation: u64,
    closed: bool,
}

struct PendingSave {
    handle: JoinHandle<()>,
}

impl AutosaveCoordinator {
    pub fn new(
        user_id: Uuid,
        store: Arc<dyn ResumeStore>,
        notices: Notices,
        document: ResumeDocument,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                user_id,
                store,
                notices,
                state: Mutex::new(State {
                    document,
                    pending: None,
                    generation: 0,
                    closed: false,
                }),
                in_flight: AtomicUsize::new(0),
                write_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the live document.
    pub fn document(&self) -> ResumeDocument {
        self.inner.lock_state().document.clone()
    }

    pub fn status(&self) -> AutosaveStatus {
        let pending = self.inner.lock_state().pending.is_some();
        AutosaveStatus {
            pending,
            saving: self.inner.in_flight.load(Ordering::SeqCst) > 0,
        }
    }

    /// Replaces the live document and restarts the debounce window.
    /// Never blocks on I/O.
    pub fn on_data_changed(&self, mut document: ResumeDocument) -> Result<(), AutosaveError> {
        let mut state = self.inner.lock_state();
        if state.closed {
            return Err(AutosaveError::Closed);
        }
        if document.id.is_none() {
            document.id = state.document.id;
        }
        state.document = document;
        self.inner.schedule(&mut state);
        Ok(())
    }

    /// Applies `edit` to a copy of the live document. On success the copy
    /// becomes the live document and the debounce window restarts; on error
    /// nothing changes and nothing is scheduled.
    pub fn apply<T, E>(
        &self,
        edit: impl FnOnce(&mut ResumeDocument) -> Result<T, E>,
    ) -> Result<Result<T, E>, AutosaveError> {
        let mut state = self.inner.lock_state();
        if state.closed {
            return Err(AutosaveError::Closed);
        }
        let mut draft = state.document.clone();
        let result = edit(&mut draft);
        if result.is_ok() {
            draft.id = state.document.id;
            state.document = draft;
            self.inner.schedule(&mut state);
        }
        Ok(result)
    }

    /// Cancels any pending automatic save and persists the live document now.
    pub async fn save_now(&self) -> Result<SaveOutcome, AutosaveError> {
        let document = {
            let mut state = self.inner.lock_state();
            if state.closed {
                return Err(AutosaveError::Closed);
            }
            Inner::cancel_pending(&mut state);
            state.document.clone()
        };
        debug!("Manual save requested for user {}", self.inner.user_id);
        Ok(self.inner.persist(document).await?)
    }

    /// Cancels the pending timer and refuses any further scheduling.
    /// A persist already in flight is left to finish.
    pub fn shutdown(&self) {
        let mut state = self.inner.lock_state();
        if !state.closed {
            state.closed = true;
            Inner::cancel_pending(&mut state);
            debug!("Autosave coordinator closed for user {}", self.inner.user_id);
        }
    }
}

impl Drop for AutosaveCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_pending(state: &mut State) {
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            // Aborting a timer that already fired is a no-op.
            pending.handle.abort();
        }
    }

    fn schedule(self: &Arc<Self>, state: &mut State) {
        Self::cancel_pending(state);
        let generation = state.generation;
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(AUTOSAVE_DEBOUNCE).await;
            inner.fire(generation);
        });
        state.pending = Some(PendingSave { handle });
    }

    fn fire(self: Arc<Self>, generation: u64) {
        let document = {
            let mut state = self.lock_state();
            if state.closed || state.generation != generation {
                return;
            }
            state.pending = None;
            state.document.clone()
        };
        debug!("Autosave window elapsed for user {}", self.user_id);
        tokio::spawn(async move {
            // Outcome is reported through notices.
            let _ = self.persist(document).await;
        });
    }

    async fn persist(&self, document: ResumeDocument) -> Result<SaveOutcome, StoreError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        let _gate = self.write_gate.lock().await;

        let known_id = document.id.or_else(|| self.lock_state().document.id);
        let result = match known_id {
            Some(id) => self
                .store
                .update(id, self.user_id, &document)
                .await
                .map(|()| SaveOutcome {
                    resume_id: id,
                    created: false,
                }),
            None => self
                .store
                .create(self.user_id, &document)
                .await
                .map(|id| {
                    let mut state = self.lock_state();
                    if state.document.id.is_none() {
                        state.document.id = Some(id);
                    }
                    SaveOutcome {
                        resume_id: id,
                        created: true,
                    }
                }),
        };

        match &result {
            Ok(outcome) => {
                info!(
                    "Saved resume {} for user {} (created: {})",
                    outcome.resume_id, self.user_id, outcome.created
                );
                self.notices
                    .info("Resume saved", "Your resume has been saved successfully.");
            }
            Err(e) => {
                error!("Error saving resume for user {}: {e}", self.user_id);
                self.notices.error("Error saving resume", e.to_string());
            }
        }
        result
    }
}

/// Counts a persist as in flight for as long as the guard lives.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

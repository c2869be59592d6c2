//! # Debounced Auto-save
//!
//! Editors produce a change on every keystroke. Writing the whole collection
//! each time is wasteful, so edits go through an [`AutoSaver`] which holds a
//! single pending write and commits it once the editor has been quiet for the
//! debounce window.
//!
//! ## State Machine
//!
//! ```text
//!            edit                window elapsed            write done
//!   Idle ───────────► Scheduled ─────────────────► Committing ─────────► Idle
//!     ▲                 │  ▲ │                                    (or Scheduled
//!     │     cancel      │  └─┘ edit: merge + restart timer        if edited
//!     └─────────────────┘                                          meanwhile)
//! ```
//!
//! - Every edit merges into the pending [`NoteUpdate`] (later fields win) and
//!   restarts the timer.
//! - An edit for a different note commits the pending one first.
//! - [`AutoSaver::flush`] commits immediately.
//! - [`AutoSaver::cancel`] drops the pending write.
//! - [`AutoSaver::teardown`] (also run on drop) cancels and closes the saver:
//!   no write happens after it, even if a timer was about to fire.
//!
//! Commit failures are logged and kept in [`AutoSaver::last_error`]. The
//! failed edit stays pending (under any newer edits), so the next
//! [`AutoSaver::flush`] or edit retries it; the caller decides when. Edits to
//! a note that no longer exists are dropped.

use crate::api::NotesApi;
use crate::model::NoteUpdate;
use crate::store::StorageBackend;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Scheduled,
    Committing,
}

struct Pending {
    id: String,
    update: NoteUpdate,
}

struct Inner {
    state: SaveState,
    pending: Option<Pending>,
    timer: Option<JoinHandle<()>>,
    // Bumped whenever a scheduled timer is superseded
    generation: u64,
    closed: bool,
    commits: usize,
    last_error: Option<String>,
}

impl Inner {
    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation += 1;
    }
}

pub struct AutoSaver<B: StorageBackend + 'static> {
    api: Arc<NotesApi<B>>,
    window: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl<B: StorageBackend + 'static> AutoSaver<B> {
    pub fn new(api: Arc<NotesApi<B>>, window: Duration) -> Self {
        Self {
            api,
            window,
            inner: Arc::new(Mutex::new(Inner {
                state: SaveState::Idle,
                pending: None,
                timer: None,
                generation: 0,
                closed: false,
                commits: 0,
                last_error: None,
            })),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an edit and (re)start the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn edit(&self, id: &str, update: NoteUpdate) {
        let other_note_pending = {
            let inner = lock(&self.inner);
            if inner.closed {
                debug!(note_id = %id, "Edit after teardown ignored");
                return;
            }
            inner.pending.as_ref().is_some_and(|p| p.id != id)
        };
        if other_note_pending {
            self.flush().await;
        }

        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }
        match inner.pending.as_mut() {
            Some(pending) => pending.update.merge(update),
            None => {
                inner.pending = Some(Pending {
                    id: id.to_string(),
                    update,
                })
            }
        }

        inner.stop_timer();
        let generation = inner.generation;
        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.inner);
        let window = self.window;
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            commit(&api, &shared, Some(generation)).await;
        }));
        if inner.state != SaveState::Committing {
            inner.state = SaveState::Scheduled;
        }
    }

    /// Commit the pending write now, if there is one.
    pub async fn flush(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.stop_timer();
        }
        commit(&self.api, &self.inner, None).await;
    }

    /// Drop the pending write without saving it.
    pub fn cancel(&self) {
        let mut inner = lock(&self.inner);
        inner.stop_timer();
        if inner.pending.take().is_some() {
            debug!("Pending auto-save cancelled");
        }
        if inner.state == SaveState::Scheduled {
            inner.state = SaveState::Idle;
        }
    }

    /// Cancel and close. Nothing is written after this returns.
    pub fn teardown(&self) {
        self.cancel();
        lock(&self.inner).closed = true;
    }

    pub fn state(&self) -> SaveState {
        lock(&self.inner).state
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.inner).pending.is_some()
    }

    /// Number of successful commits.
    pub fn commits(&self) -> usize {
        lock(&self.inner).commits
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.inner).last_error.clone()
    }
}

impl<B: StorageBackend + 'static> Drop for AutoSaver<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn commit<B: StorageBackend>(
    api: &NotesApi<B>,
    inner: &Mutex<Inner>,
    expected_generation: Option<u64>,
) {
    let pending = {
        let mut guard = lock(inner);
        if guard.closed {
            return;
        }
        if expected_generation.is_some_and(|g| g != guard.generation) {
            return;
        }
        guard.timer = None;
        match guard.pending.take() {
            Some(pending) => {
                guard.state = SaveState::Committing;
                pending
            }
            None => {
                guard.state = SaveState::Idle;
                return;
            }
        }
    };

    let result = api.update_note(&pending.id, pending.update.clone()).await;

    let mut guard = lock(inner);
    match result {
        Ok(note) => {
            guard.commits += 1;
            guard.last_error = None;
            debug!(note_id = %note.id, "Auto-saved note");
        }
        Err(e) => {
            warn!(note_id = %pending.id, error = %e, "Auto-save failed");
            guard.last_error = Some(e.to_string());
            if e.is_not_found() {
                debug!(note_id = %pending.id, "Dropping edit for a deleted note");
            } else {
                requeue(&mut guard, pending);
            }
        }
    }
    guard.state = if guard.pending.is_some() {
        SaveState::Scheduled
    } else {
        SaveState::Idle
    };
}

/// Put a failed write back, with any edit made during the commit on top.
fn requeue(inner: &mut Inner, failed: Pending) {
    match inner.pending.take() {
        Some(newer) if newer.id == failed.id => {
            let mut update = failed.update;
            update.merge(newer.update);
            inner.pending = Some(Pending {
                id: failed.id,
                update,
            });
        }
        Some(other) => {
            warn!(note_id = %failed.id, "Failed auto-save superseded by an edit to another note");
            inner.pending = Some(other);
        }
        None => inner.pending = Some(failed),
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

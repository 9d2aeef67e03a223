//! Announcement list with optimistic delete and time-boxed undo.
//!
//! Deleting an announcement removes it from the local list immediately and
//! starts a timer; the backend delete is only issued once the timer elapses.
//! Undo within the window restores the item and no backend delete ever
//! happens. One pending delete is tracked at a time: starting another delete
//! overwrites the tracked one and cancels its timer, so only the most recent
//! deletion is undoable. A failed backend delete restores the item and
//! records an error, so the local list never diverges permanently from a
//! failed operation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::document_request::RecordId;
use crate::domain::error::Error;
use crate::domain::ports::AnnouncementRepository;

/// The delete a board is currently holding back.
struct PendingDelete {
    announcement: Announcement,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct BoardState {
    items: Vec<Announcement>,
    pending: Option<PendingDelete>,
    last_error: Option<Error>,
}

/// Staff-facing announcement list with delete-with-undo semantics.
pub struct AnnouncementBoard {
    repo: Arc<dyn AnnouncementRepository>,
    undo_window: Duration,
    state: Arc<Mutex<BoardState>>,
}

impl AnnouncementBoard {
    /// Build a board over the given repository. `undo_window` is how long a
    /// delete can be undone before it commits.
    pub fn new(repo: Arc<dyn AnnouncementRepository>, undo_window: Duration) -> Self {
        Self {
            repo,
            undo_window,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // Short critical sections only; a poisoned lock means a panic
        // elsewhere already aborted the test run.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Reload the list from the store. An item with a pending delete stays
    /// hidden even though the store still holds it.
    pub async fn refresh(&self) -> Result<Vec<Announcement>, Error> {
        let mut items = self.repo.list_all().await.map_err(Error::from)?;
        let mut state = self.lock();
        if let Some(pending) = &state.pending {
            items.retain(|item| item.id != pending.announcement.id);
        }
        state.items = items.clone();
        Ok(items)
    }

    /// The list as currently visible.
    pub fn items(&self) -> Vec<Announcement> {
        self.lock().items.clone()
    }

    /// The most recent delete failure, cleared on read.
    pub fn take_error(&self) -> Option<Error> {
        self.lock().last_error.take()
    }

    /// Publish a new announcement and show it at the top of the list.
    pub async fn publish(&self, draft: &NewAnnouncement) -> Result<Announcement, Error> {
        let announcement = self.repo.create(draft).await.map_err(Error::from)?;
        self.lock().items.insert(0, announcement.clone());
        Ok(announcement)
    }

    /// Overwrite a stored announcement and its visible entry.
    pub async fn update(&self, announcement: &Announcement) -> Result<(), Error> {
        self.repo.update(announcement).await.map_err(Error::from)?;
        let mut state = self.lock();
        if let Some(slot) = state.items.iter_mut().find(|i| i.id == announcement.id) {
            *slot = announcement.clone();
        }
        Ok(())
    }

    /// Remove an announcement from the visible list and schedule the backend
    /// delete for after the undo window. A delete already pending is
    /// overwritten: its timer is cancelled and it stops being undoable.
    pub fn delete(&self, id: &RecordId) -> Result<(), Error> {
        let mut state = self.lock();
        let index = state
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| Error::not_found("announcement not found"))?;
        let announcement = state.items.remove(index);
        if let Some(previous) = state.pending.take() {
            previous.timer.abort();
            info!(
                id = %previous.announcement.id,
                "pending delete overwritten before it committed"
            );
        }
        let timer = self.spawn_commit(announcement.id.clone());
        state.pending = Some(PendingDelete {
            announcement,
            timer,
        });
        Ok(())
    }

    /// Cancel the pending delete and put the announcement back at the top of
    /// the list. Returns the restored announcement, or `None` when nothing
    /// was pending.
    pub fn undo(&self) -> Option<Announcement> {
        let mut state = self.lock();
        let pending = state.pending.take()?;
        pending.timer.abort();
        state.items.insert(0, pending.announcement.clone());
        Some(pending.announcement)
    }

    fn spawn_commit(&self, id: RecordId) -> JoinHandle<()> {
        let repo = Arc::clone(&self.repo);
        let state = Arc::clone(&self.state);
        let undo_window = self.undo_window;
        tokio::spawn(async move {
            tokio::time::sleep(undo_window).await;
            let announcement = {
                let mut guard = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                match guard.pending.take() {
                    Some(pending) if pending.announcement.id == id => pending.announcement,
                    other => {
                        // Another delete took the slot between the timer
                        // firing and this task running.
                        guard.pending = other;
                        return;
                    }
                }
            };
            if let Err(err) = repo.delete(&id).await {
                error!(id = %id, error = %err, "backend delete failed; restoring item");
                let mut guard = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                guard.items.insert(0, announcement);
                guard.last_error = Some(Error::from(err));
            }
        })
    }
}

//! Sync Coordinator: when in-memory order mutations reach the persistence
//! layer.
//!
//! Per-list `task_order` changes push immediately (one call per completed
//! move). Board-level `list_order` changes debounce on the trailing edge —
//! a drag sequence fires several intermediate layout changes and only the
//! last one is worth writing. Pushes are fire-and-forget: a failure is
//! surfaced as a [`PushFailure`] notice for a non-blocking warning, and the
//! optimistic local state is never rolled back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::BoardData;

/// Quiet period before a pending board-layout change is written.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Transport failure from the persistence collaborator. All persistence
/// failures are treated uniformly; the message is for logs and warnings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("persistence push failed: {0}")]
pub struct PersistError(pub String);

impl PersistError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The document-store collaborator the board engine loads from and pushes
/// order mutations to. Implementations: the in-process server store, a REST
/// client, test doubles.
pub trait BoardPersistence: Send + Sync + 'static {
    fn fetch_board_state(&self, board_id: &str) -> Result<BoardData, PersistError>;
    fn persist_list_order(&self, list_id: &str, order: &[String]) -> Result<(), PersistError>;
    fn persist_board_layout(
        &self,
        board_id: &str,
        list_order: &[String],
    ) -> Result<(), PersistError>;
    fn persist_task_owner(&self, task_id: &str, new_list_id: &str) -> Result<(), PersistError>;
    fn delete_list(&self, list_id: &str) -> Result<(), PersistError>;
    fn delete_task(&self, task_id: &str) -> Result<(), PersistError>;
}

/// A failed asynchronous push, reported for a user-visible non-fatal
/// warning. Local order state stays authoritative until the next full
/// reload.
#[derive(Debug, Clone)]
pub struct PushFailure {
    /// Container whose order (or owning reference) failed to persist.
    pub container: String,
    pub error: PersistError,
}

/// Owns the push contract between in-memory order state and the
/// persistence layer.
pub struct SyncCoordinator {
    persistence: Arc<dyn BoardPersistence>,
    quiet_period: Duration,
    /// Pending debounced layout push per board id. Re-scheduling aborts and
    /// replaces the previous task (trailing-edge debounce).
    pending_layout: Mutex<HashMap<String, JoinHandle<()>>>,
    failure_tx: mpsc::UnboundedSender<PushFailure>,
}

impl SyncCoordinator {
    /// Returns the coordinator and the receiver for push-failure notices.
    pub fn new(
        persistence: Arc<dyn BoardPersistence>,
        quiet_period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PushFailure>) {
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        (
            Self {
                persistence,
                quiet_period,
                pending_layout: Mutex::new(HashMap::new()),
                failure_tx,
            },
            failure_rx,
        )
    }

    pub fn persistence(&self) -> &Arc<dyn BoardPersistence> {
        &self.persistence
    }

    /// Push a list's task order immediately.
    pub fn push_list_order(&self, list_id: &str, order: Vec<String>) {
        let persistence = Arc::clone(&self.persistence);
        let tx = self.failure_tx.clone();
        let list_id = list_id.to_string();
        tokio::spawn(async move {
            if let Err(error) = persistence.persist_list_order(&list_id, &order) {
                log::warn!("[sync] list order push failed for {}: {}", list_id, error);
                let _ = tx.send(PushFailure {
                    container: list_id,
                    error,
                });
            }
        });
    }

    /// Push a task's owning-list reference immediately (cross-list move).
    pub fn push_task_owner(&self, task_id: &str, new_list_id: &str) {
        let persistence = Arc::clone(&self.persistence);
        let tx = self.failure_tx.clone();
        let task_id = task_id.to_string();
        let new_list_id = new_list_id.to_string();
        tokio::spawn(async move {
            if let Err(error) = persistence.persist_task_owner(&task_id, &new_list_id) {
                log::warn!("[sync] owner push failed for task {}: {}", task_id, error);
                let _ = tx.send(PushFailure {
                    container: new_list_id,
                    error,
                });
            }
        });
    }

    /// Schedule a debounced board-layout push. Each call cancels and
    /// replaces any pending push for the same board, so a rapid reorder
    /// sequence collapses into one write after the quiet period.
    pub fn schedule_board_layout(&self, board_id: &str, list_order: Vec<String>) {
        let persistence = Arc::clone(&self.persistence);
        let tx = self.failure_tx.clone();
        let quiet = self.quiet_period;
        let id = board_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if let Err(error) = persistence.persist_board_layout(&id, &list_order) {
                log::warn!("[sync] layout push failed for board {}: {}", id, error);
                let _ = tx.send(PushFailure {
                    container: id,
                    error,
                });
            }
        });
        let mut pending = self
            .pending_layout
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(prev) = pending.insert(board_id.to_string(), handle) {
            prev.abort();
        }
    }

    /// Push the board layout immediately, cancelling any pending debounced
    /// push for that board.
    pub fn push_board_layout_now(&self, board_id: &str, list_order: Vec<String>) {
        {
            let mut pending = self
                .pending_layout
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(prev) = pending.remove(board_id) {
                prev.abort();
            }
        }
        let persistence = Arc::clone(&self.persistence);
        let tx = self.failure_tx.clone();
        let id = board_id.to_string();
        tokio::spawn(async move {
            if let Err(error) = persistence.persist_board_layout(&id, &list_order) {
                log::warn!("[sync] layout push failed for board {}: {}", id, error);
                let _ = tx.send(PushFailure {
                    container: id,
                    error,
                });
            }
        });
    }

    /// Cancel any pending layout push (resync discards local order state,
    /// so a stale pending write must not fire afterwards).
    pub fn cancel_pending(&self, board_id: &str) {
        let mut pending = self
            .pending_layout
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(prev) = pending.remove(board_id) {
            prev.abort();
        }
    }
}

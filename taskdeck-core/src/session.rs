//! Board session: the owned state container for one loaded board.
//!
//! Holds the board, its lists and tasks, and the Order Store, and routes
//! every mutation through the Move Executor and Sync Coordinator. There is
//! exactly one logical writer per session: a move event is processed to
//! completion before the next is accepted, so no locking is needed around
//! the in-memory order state.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::moves::{self, MoveError, MoveEvent, MoveKind, MoveOutcome};
use crate::order::OrderStore;
use crate::reconcile::reconcile_order;
use crate::sync::{BoardPersistence, PersistError, PushFailure, SyncCoordinator};
use crate::types::{Board, BoardData, Task, TaskList};

#[derive(Debug, Error)]
pub enum SessionError {
    /// A move was rejected; the caller should discard the event and call
    /// [`BoardSession::resync`] rather than attempt partial repair.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// A synchronous collaborator call failed (load, resync, delete).
    #[error(transparent)]
    Persistence(#[from] PersistError),

    #[error("unknown list {0}")]
    UnknownList(String),

    #[error("unknown task {0}")]
    UnknownTask(String),
}

/// One loaded board with its ordering state.
///
/// Construction requires a tokio runtime: order pushes are spawned
/// fire-and-forget tasks.
pub struct BoardSession {
    board: Board,
    lists: Vec<TaskList>,
    tasks: Vec<Task>,
    orders: OrderStore,
    sync: SyncCoordinator,
}

impl BoardSession {
    /// Fetch a board and build a session around it. Every order array is
    /// reconciled against the live member set; repairs are persisted
    /// fire-and-forget (a failed repair just repeats on the next load).
    ///
    /// The returned receiver delivers [`PushFailure`] notices for
    /// non-blocking user warnings.
    pub fn load(
        persistence: Arc<dyn BoardPersistence>,
        board_id: &str,
        quiet_period: std::time::Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PushFailure>), SessionError> {
        let data = persistence.fetch_board_state(board_id)?;
        let (sync, failure_rx) = SyncCoordinator::new(persistence, quiet_period);
        let mut session = Self {
            board: data.board.clone(),
            lists: Vec::new(),
            tasks: Vec::new(),
            orders: OrderStore::new(),
            sync,
        };
        session.install(data);
        Ok((session, failure_rx))
    }

    /// Discard all local order state and rebuild from the source of truth.
    /// This is the required response to `StaleReference` / `OrderDesync`.
    pub fn resync(&mut self) -> Result<(), SessionError> {
        self.sync.cancel_pending(&self.board.id);
        let data = self.sync.persistence().fetch_board_state(&self.board.id)?;
        self.install(data);
        Ok(())
    }

    /// Install fetched state, reconciling every order array.
    fn install(&mut self, data: BoardData) {
        let BoardData {
            mut board,
            mut lists,
            tasks,
        } = data;

        let live_lists: Vec<String> = lists.iter().map(|l| l.id.clone()).collect();
        let outcome = reconcile_order(&board.list_order, &live_lists);
        if outcome.dropped {
            log::info!(
                "[session] repaired listOrder for board {}: dropped {} orphan(s)",
                board.id,
                board.list_order.len() + outcome.appended - outcome.order.len()
            );
            self.sync
                .push_board_layout_now(&board.id, outcome.order.clone());
        }
        board.list_order = outcome.order;

        self.orders = OrderStore::new();
        self.orders
            .set_order(&board.id, board.list_order.clone());

        for list in &mut lists {
            let live_tasks: Vec<String> = tasks
                .iter()
                .filter(|t| t.list == list.id)
                .map(|t| t.id.clone())
                .collect();
            let outcome = reconcile_order(&list.task_order, &live_tasks);
            if outcome.dropped {
                log::info!(
                    "[session] repaired taskOrder for list {} ({})",
                    list.id,
                    list.title
                );
                self.sync.push_list_order(&list.id, outcome.order.clone());
            }
            list.task_order = outcome.order;
            self.orders.set_order(&list.id, list.task_order.clone());
        }

        self.board = board;
        self.lists = lists;
        self.tasks = tasks;
    }

    /// Apply one completed drag gesture. On success the order state is
    /// mutated and the resulting pushes are issued (debounced for board
    /// layout, immediate for list orders and owner updates).
    pub fn apply_move(&mut self, event: &MoveEvent) -> Result<MoveOutcome, SessionError> {
        match event.kind {
            MoveKind::List => {
                // The board is the only container lists live in; a
                // cross-container list event cannot come from a valid drag.
                if event.source_container != self.board.id
                    || event.dest_container != self.board.id
                {
                    return Err(MoveError::OrderDesync {
                        id: event.moved_id.clone(),
                        container: event.source_container.clone(),
                    }
                    .into());
                }
            }
            MoveKind::Task => {
                if !self.lists.iter().any(|l| l.id == event.source_container) {
                    return Err(SessionError::UnknownList(event.source_container.clone()));
                }
                if !self.lists.iter().any(|l| l.id == event.dest_container) {
                    return Err(SessionError::UnknownList(event.dest_container.clone()));
                }
            }
        }

        let orders = &mut self.orders;
        let outcome = match event.kind {
            MoveKind::List => {
                let lists = &self.lists;
                moves::apply_move(orders, event, |id| lists.iter().any(|l| l.id == id))?
            }
            MoveKind::Task => {
                let tasks = &self.tasks;
                moves::apply_move(orders, event, |id| tasks.iter().any(|t| t.id == id))?
            }
        };

        match &outcome {
            MoveOutcome::Noop => {}
            MoveOutcome::Reordered { container } => {
                if event.kind == MoveKind::List {
                    self.board.list_order = self.orders.order(&self.board.id).to_vec();
                    self.sync
                        .schedule_board_layout(&self.board.id, self.board.list_order.clone());
                } else {
                    let order = self.orders.order(container).to_vec();
                    self.set_task_order(container, order.clone());
                    self.sync.push_list_order(container, order);
                }
            }
            MoveOutcome::Relocated { source, dest } => {
                // One logical transaction: both order arrays plus the
                // owning-list reference. Pushes are optimistic; a failure
                // surfaces as a PushFailure and is never rolled back.
                let source_order = self.orders.order(source).to_vec();
                let dest_order = self.orders.order(dest).to_vec();
                self.set_task_order(source, source_order.clone());
                self.set_task_order(dest, dest_order.clone());
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == event.moved_id) {
                    task.list = dest.clone();
                }
                self.sync.push_list_order(source, source_order);
                self.sync.push_list_order(dest, dest_order);
                self.sync.push_task_owner(&event.moved_id, dest);
            }
        }

        Ok(outcome)
    }

    /// Record a list created by the CRUD layer: appended to the board's
    /// layout, pushed after the quiet period.
    pub fn note_list_created(&mut self, list: TaskList) {
        self.orders.push(&self.board.id, &list.id);
        self.board.list_order = self.orders.order(&self.board.id).to_vec();
        self.orders.set_order(&list.id, list.task_order.clone());
        self.lists.push(list);
        self.sync
            .schedule_board_layout(&self.board.id, self.board.list_order.clone());
    }

    /// Record a task created by the CRUD layer: appended to its list's
    /// order, pushed immediately.
    pub fn note_task_created(&mut self, task: Task) -> Result<(), SessionError> {
        if !self.lists.iter().any(|l| l.id == task.list) {
            return Err(SessionError::UnknownList(task.list.clone()));
        }
        self.orders.push(&task.list, &task.id);
        let order = self.orders.order(&task.list).to_vec();
        self.set_task_order(&task.list, order.clone());
        self.sync.push_list_order(&task.list, order);
        self.tasks.push(task);
        Ok(())
    }

    /// Delete a list and its tasks. The collaborator delete runs first;
    /// local state changes only on success.
    pub fn delete_list(&mut self, list_id: &str) -> Result<(), SessionError> {
        if !self.lists.iter().any(|l| l.id == list_id) {
            return Err(SessionError::UnknownList(list_id.to_string()));
        }
        self.sync.persistence().delete_list(list_id)?;

        self.lists.retain(|l| l.id != list_id);
        self.tasks.retain(|t| t.list != list_id);
        self.orders.remove_container(list_id);
        self.orders.remove_by_id(&self.board.id, list_id);
        self.board.list_order = self.orders.order(&self.board.id).to_vec();
        self.sync
            .schedule_board_layout(&self.board.id, self.board.list_order.clone());
        Ok(())
    }

    /// Delete a task and pull it from its list's order.
    pub fn delete_task(&mut self, task_id: &str) -> Result<(), SessionError> {
        let list_id = self
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .map(|t| t.list.clone())
            .ok_or_else(|| SessionError::UnknownTask(task_id.to_string()))?;
        self.sync.persistence().delete_task(task_id)?;

        self.tasks.retain(|t| t.id != task_id);
        self.orders.remove_by_id(&list_id, task_id);
        let order = self.orders.order(&list_id).to_vec();
        self.set_task_order(&list_id, order.clone());
        self.sync.push_list_order(&list_id, order);
        Ok(())
    }

    /// Force the board layout to persist now, skipping the debounce.
    pub fn save_layout_now(&self) {
        self.sync
            .push_board_layout_now(&self.board.id, self.board.list_order.clone());
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Lists in display order.
    pub fn ordered_lists(&self) -> Vec<&TaskList> {
        self.orders
            .order(&self.board.id)
            .iter()
            .filter_map(|id| self.lists.iter().find(|l| &l.id == id))
            .collect()
    }

    /// A list's tasks in display order.
    pub fn ordered_tasks(&self, list_id: &str) -> Vec<&Task> {
        self.orders
            .order(list_id)
            .iter()
            .filter_map(|id| self.tasks.iter().find(|t| &t.id == id))
            .collect()
    }

    /// Mirror the order store back into the list struct so the two can
    /// never disagree past a mutation.
    fn set_task_order(&mut self, list_id: &str, order: Vec<String>) {
        if let Some(list) = self.lists.iter_mut().find(|l| l.id == list_id) {
            list.task_order = order;
        }
    }
}

//! In-memory document store for boards, lists, and tasks.
//!
//! Records live in RwLock-guarded vectors in creation order (the fetch
//! endpoint returns lists oldest-first, like the original). Ownership is
//! checked on every CRUD call: a board belonging to someone else is
//! indistinguishable from a missing one.
//!
//! The store also implements [`BoardPersistence`] so a core `BoardSession`
//! can run against it in-process.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use taskdeck_core::reconcile::reconcile_order;
use taskdeck_core::sync::{BoardPersistence, PersistError};
use taskdeck_core::types::{dedup_labels, Board, BoardData, Priority, Task, TaskList};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Title is required")]
    MissingTitle,
}

/// A board plus its owning user.
#[derive(Debug, Clone)]
struct BoardRecord {
    owner: String,
    board: Board,
}

/// Fields for a new task. Labels are deduplicated on create.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub labels: Vec<String>,
}

/// Partial task update. Outer `None` means "leave unchanged"; the inner
/// option on clearable fields distinguishes "set" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<String>>,
    /// Reassign to another list: pulls the id from the old list's order and
    /// appends it to the new one's.
    pub list: Option<String>,
}

pub struct MemStore {
    boards: RwLock<Vec<BoardRecord>>,
    lists: RwLock<Vec<TaskList>>,
    tasks: RwLock<Vec<Task>>,
}

/// The three starter lists (and their sample tasks) every new board gets.
const DEFAULT_LISTS: &[(&str, &[(&str, &str, Priority)])] = &[
    (
        "To Do",
        &[
            (
                "Welcome to your new board!",
                "This is a sample task to get you started.",
                Priority::Medium,
            ),
            (
                "Add your first task",
                "Use the + button to create your own tasks.",
                Priority::Low,
            ),
        ],
    ),
    (
        "In Progress",
        &[(
            "Sample in-progress task",
            "This shows how tasks look when they are being worked on.",
            Priority::High,
        )],
    ),
    (
        "Done",
        &[(
            "Sample completed task",
            "This shows how completed tasks appear.",
            Priority::Medium,
        )],
    ),
];

impl MemStore {
    pub fn new() -> Self {
        Self {
            boards: RwLock::new(Vec::new()),
            lists: RwLock::new(Vec::new()),
            tasks: RwLock::new(Vec::new()),
        }
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Create a board with the default lists and their sample tasks; each
    /// created entity appends its id to the parent's order array.
    pub fn create_board(&self, owner: &str, title: &str) -> Result<BoardData, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::MissingTitle);
        }
        let mut board = Board {
            id: Self::new_id(),
            title: title.to_string(),
            list_order: Vec::new(),
        };
        let mut created_lists = Vec::new();
        let mut created_tasks = Vec::new();

        for (list_title, samples) in DEFAULT_LISTS {
            let mut list = TaskList {
                id: Self::new_id(),
                board: board.id.clone(),
                title: (*list_title).to_string(),
                task_order: Vec::new(),
            };
            for (task_title, description, priority) in *samples {
                let task = Task {
                    id: Self::new_id(),
                    board: board.id.clone(),
                    list: list.id.clone(),
                    title: (*task_title).to_string(),
                    description: Some((*description).to_string()),
                    due_date: None,
                    priority: *priority,
                    labels: vec!["sample".to_string()],
                };
                list.task_order.push(task.id.clone());
                created_tasks.push(task);
            }
            board.list_order.push(list.id.clone());
            created_lists.push(list);
        }

        self.boards.write().unwrap().push(BoardRecord {
            owner: owner.to_string(),
            board: board.clone(),
        });
        self.lists.write().unwrap().extend(created_lists.clone());
        self.tasks.write().unwrap().extend(created_tasks.clone());

        log::info!("[store] created board {} for {}", board.id, owner);
        Ok(BoardData {
            board,
            lists: created_lists,
            tasks: created_tasks,
        })
    }

    pub fn list_boards(&self, owner: &str) -> Vec<Board> {
        self.boards
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.owner == owner)
            .map(|r| r.board.clone())
            .collect()
    }

    fn owned_board(&self, owner: &str, board_id: &str) -> Result<Board, StoreError> {
        self.boards
            .read()
            .unwrap()
            .iter()
            .find(|r| r.board.id == board_id && r.owner == owner)
            .map(|r| r.board.clone())
            .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))
    }

    /// Full board payload: the board, its lists in creation order, and all
    /// of its tasks. Every order array is reconciled against the live
    /// member set before returning; repairs are written back in place.
    pub fn board_data(&self, owner: &str, board_id: &str) -> Result<BoardData, StoreError> {
        let mut board = self.owned_board(owner, board_id)?;
        let mut lists: Vec<TaskList> = self
            .lists
            .read()
            .unwrap()
            .iter()
            .filter(|l| l.board == board_id)
            .cloned()
            .collect();
        let tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.board == board_id)
            .cloned()
            .collect();

        let live_lists: Vec<String> = lists.iter().map(|l| l.id.clone()).collect();
        let outcome = reconcile_order(&board.list_order, &live_lists);
        if outcome.dropped {
            log::info!("[store] repaired listOrder of board {} on load", board_id);
            self.write_board_layout(board_id, &outcome.order);
        }
        board.list_order = outcome.order;

        for list in &mut lists {
            let live_tasks: Vec<String> = tasks
                .iter()
                .filter(|t| t.list == list.id)
                .map(|t| t.id.clone())
                .collect();
            let outcome = reconcile_order(&list.task_order, &live_tasks);
            if outcome.dropped {
                log::info!("[store] repaired taskOrder of list {} on load", list.id);
                self.write_task_order(&list.id, &outcome.order);
            }
            list.task_order = outcome.order;
        }

        Ok(BoardData {
            board,
            lists,
            tasks,
        })
    }

    pub fn update_board(
        &self,
        owner: &str,
        board_id: &str,
        title: Option<String>,
        list_order: Option<Vec<String>>,
    ) -> Result<Board, StoreError> {
        let mut boards = self.boards.write().unwrap();
        let record = boards
            .iter_mut()
            .find(|r| r.board.id == board_id && r.owner == owner)
            .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
        if let Some(title) = title {
            record.board.title = title;
        }
        if let Some(order) = list_order {
            record.board.list_order = order;
        }
        Ok(record.board.clone())
    }

    /// Delete a board and everything under it.
    pub fn delete_board(&self, owner: &str, board_id: &str) -> Result<(), StoreError> {
        let mut boards = self.boards.write().unwrap();
        let before = boards.len();
        boards.retain(|r| !(r.board.id == board_id && r.owner == owner));
        if boards.len() == before {
            return Err(StoreError::BoardNotFound(board_id.to_string()));
        }
        drop(boards);
        self.tasks.write().unwrap().retain(|t| t.board != board_id);
        self.lists.write().unwrap().retain(|l| l.board != board_id);
        log::info!("[store] deleted board {} (cascade)", board_id);
        Ok(())
    }

    /// Create a list and append it to the board's layout.
    pub fn create_list(
        &self,
        owner: &str,
        board_id: &str,
        title: &str,
    ) -> Result<TaskList, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::MissingTitle);
        }
        let mut boards = self.boards.write().unwrap();
        let record = boards
            .iter_mut()
            .find(|r| r.board.id == board_id && r.owner == owner)
            .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))?;
        let list = TaskList {
            id: Self::new_id(),
            board: board_id.to_string(),
            title: title.to_string(),
            task_order: Vec::new(),
        };
        record.board.list_order.push(list.id.clone());
        drop(boards);
        self.lists.write().unwrap().push(list.clone());
        Ok(list)
    }

    fn owned_list(&self, owner: &str, list_id: &str) -> Result<TaskList, StoreError> {
        let list = self
            .lists
            .read()
            .unwrap()
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        // Ownership flows through the board
        self.owned_board(owner, &list.board)
            .map_err(|_| StoreError::ListNotFound(list_id.to_string()))?;
        Ok(list)
    }

    pub fn update_list(
        &self,
        owner: &str,
        list_id: &str,
        title: Option<String>,
        task_order: Option<Vec<String>>,
    ) -> Result<TaskList, StoreError> {
        self.owned_list(owner, list_id)?;
        let mut lists = self.lists.write().unwrap();
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        if let Some(title) = title {
            list.title = title;
        }
        if let Some(order) = task_order {
            list.task_order = order;
        }
        Ok(list.clone())
    }

    /// Delete a list: its tasks go with it and its id is pulled from the
    /// board's layout.
    pub fn delete_list(&self, owner: &str, list_id: &str) -> Result<(), StoreError> {
        let list = self.owned_list(owner, list_id)?;
        self.tasks.write().unwrap().retain(|t| t.list != list_id);
        self.lists.write().unwrap().retain(|l| l.id != list_id);
        let mut boards = self.boards.write().unwrap();
        if let Some(record) = boards.iter_mut().find(|r| r.board.id == list.board) {
            record.board.list_order.retain(|id| id != list_id);
        }
        log::info!("[store] deleted list {} (cascade)", list_id);
        Ok(())
    }

    /// Create a task under a list and append it to the list's order.
    pub fn create_task(
        &self,
        owner: &str,
        list_id: &str,
        new_task: NewTask,
    ) -> Result<Task, StoreError> {
        if new_task.title.trim().is_empty() {
            return Err(StoreError::MissingTitle);
        }
        let list = self.owned_list(owner, list_id)?;
        let task = Task {
            id: Self::new_id(),
            board: list.board.clone(),
            list: list_id.to_string(),
            title: new_task.title,
            description: new_task.description,
            due_date: new_task.due_date,
            priority: new_task.priority.unwrap_or_default(),
            labels: dedup_labels(new_task.labels),
        };
        self.tasks.write().unwrap().push(task.clone());
        let mut lists = self.lists.write().unwrap();
        if let Some(list) = lists.iter_mut().find(|l| l.id == list_id) {
            list.task_order.push(task.id.clone());
        }
        Ok(task)
    }

    fn owned_task(&self, owner: &str, task_id: &str) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        self.owned_board(owner, &task.board)
            .map_err(|_| StoreError::TaskNotFound(task_id.to_string()))?;
        Ok(task)
    }

    pub fn update_task(
        &self,
        owner: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task, StoreError> {
        let current = self.owned_task(owner, task_id)?;
        let old_list = current.list.clone();

        let updated = {
            let mut tasks = self.tasks.write().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(due_date) = update.due_date {
                task.due_date = due_date;
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(labels) = update.labels {
                task.labels = dedup_labels(labels);
            }
            if let Some(list) = &update.list {
                task.list = list.clone();
            }
            task.clone()
        };

        if let Some(new_list) = update.list {
            if new_list != old_list {
                self.reparent_in_orders(task_id, &old_list, &new_list);
            }
        }
        Ok(updated)
    }

    /// Delete a task and pull its id from the owning list's order.
    pub fn delete_task(&self, owner: &str, task_id: &str) -> Result<(), StoreError> {
        let task = self.owned_task(owner, task_id)?;
        self.tasks.write().unwrap().retain(|t| t.id != task_id);
        let mut lists = self.lists.write().unwrap();
        if let Some(list) = lists.iter_mut().find(|l| l.id == task.list) {
            list.task_order.retain(|id| id != task_id);
        }
        Ok(())
    }

    // ── internal order maintenance ──────────────────────────────────────

    fn write_board_layout(&self, board_id: &str, list_order: &[String]) {
        let mut boards = self.boards.write().unwrap();
        if let Some(record) = boards.iter_mut().find(|r| r.board.id == board_id) {
            record.board.list_order = list_order.to_vec();
        }
    }

    fn write_task_order(&self, list_id: &str, task_order: &[String]) {
        let mut lists = self.lists.write().unwrap();
        if let Some(list) = lists.iter_mut().find(|l| l.id == list_id) {
            list.task_order = task_order.to_vec();
        }
    }

    /// Move a task id between two lists' order arrays. The pull tolerates
    /// absence; the push skips if the destination already carries the id
    /// (the client usually persists the destination order first).
    fn reparent_in_orders(&self, task_id: &str, old_list: &str, new_list: &str) {
        let mut lists = self.lists.write().unwrap();
        if let Some(list) = lists.iter_mut().find(|l| l.id == old_list) {
            list.task_order.retain(|id| id != task_id);
        }
        if let Some(list) = lists.iter_mut().find(|l| l.id == new_list) {
            if !list.task_order.iter().any(|id| id == task_id) {
                list.task_order.push(task_id.to_string());
            }
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

/// In-process persistence for a core `BoardSession`. Ownership is not
/// re-checked here: the session was handed a board the caller already
/// authorized.
impl BoardPersistence for MemStore {
    fn fetch_board_state(&self, board_id: &str) -> Result<BoardData, PersistError> {
        let owner = self
            .boards
            .read()
            .unwrap()
            .iter()
            .find(|r| r.board.id == board_id)
            .map(|r| r.owner.clone())
            .ok_or_else(|| PersistError::new(format!("Board not found: {}", board_id)))?;
        self.board_data(&owner, board_id)
            .map_err(|e| PersistError::new(e.to_string()))
    }

    fn persist_list_order(&self, list_id: &str, order: &[String]) -> Result<(), PersistError> {
        if !self.lists.read().unwrap().iter().any(|l| l.id == list_id) {
            return Err(PersistError::new(format!("List not found: {}", list_id)));
        }
        self.write_task_order(list_id, order);
        Ok(())
    }

    fn persist_board_layout(
        &self,
        board_id: &str,
        list_order: &[String],
    ) -> Result<(), PersistError> {
        if !self
            .boards
            .read()
            .unwrap()
            .iter()
            .any(|r| r.board.id == board_id)
        {
            return Err(PersistError::new(format!("Board not found: {}", board_id)));
        }
        self.write_board_layout(board_id, list_order);
        Ok(())
    }

    fn persist_task_owner(&self, task_id: &str, new_list_id: &str) -> Result<(), PersistError> {
        let old_list = {
            let mut tasks = self.tasks.write().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| PersistError::new(format!("Task not found: {}", task_id)))?;
            let old = task.list.clone();
            task.list = new_list_id.to_string();
            old
        };
        if old_list != new_list_id {
            self.reparent_in_orders(task_id, &old_list, new_list_id);
        }
        Ok(())
    }

    fn delete_list(&self, list_id: &str) -> Result<(), PersistError> {
        let board = self
            .lists
            .read()
            .unwrap()
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.board.clone())
            .ok_or_else(|| PersistError::new(format!("List not found: {}", list_id)))?;
        self.tasks.write().unwrap().retain(|t| t.list != list_id);
        self.lists.write().unwrap().retain(|l| l.id != list_id);
        let mut boards = self.boards.write().unwrap();
        if let Some(record) = boards.iter_mut().find(|r| r.board.id == board) {
            record.board.list_order.retain(|id| id != list_id);
        }
        Ok(())
    }

    fn delete_task(&self, task_id: &str) -> Result<(), PersistError> {
        let list = self
            .tasks
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id)
            .map(|t| t.list.clone())
            .ok_or_else(|| PersistError::new(format!("Task not found: {}", task_id)))?;
        self.tasks.write().unwrap().retain(|t| t.id != task_id);
        let mut lists = self.lists.write().unwrap();
        if let Some(list) = lists.iter_mut().find(|l| l.id == list) {
            list.task_order.retain(|id| id != task_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_board_seeds_default_lists() {
        let store = MemStore::new();
        let data = store.create_board("u1", "Roadmap").unwrap();
        assert_eq!(data.lists.len(), 3);
        assert_eq!(
            data.lists.iter().map(|l| l.title.as_str()).collect::<Vec<_>>(),
            ["To Do", "In Progress", "Done"]
        );
        // listOrder matches creation order
        let created: Vec<String> = data.lists.iter().map(|l| l.id.clone()).collect();
        assert_eq!(data.board.list_order, created);
        // every sample task is referenced by its list's order
        for list in &data.lists {
            let owned: Vec<&Task> = data.tasks.iter().filter(|t| t.list == list.id).collect();
            assert_eq!(list.task_order.len(), owned.len());
        }
    }

    #[test]
    fn test_foreign_board_is_invisible() {
        let store = MemStore::new();
        let data = store.create_board("alice", "Private").unwrap();
        assert!(matches!(
            store.board_data("bob", &data.board.id),
            Err(StoreError::BoardNotFound(_))
        ));
        assert!(store.list_boards("bob").is_empty());
    }

    #[test]
    fn test_delete_list_cascades() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let doomed = data.lists[0].id.clone();
        store.delete_list("u1", &doomed).unwrap();

        let fresh = store.board_data("u1", &data.board.id).unwrap();
        assert!(!fresh.board.list_order.contains(&doomed));
        assert!(fresh.lists.iter().all(|l| l.id != doomed));
        assert!(fresh.tasks.iter().all(|t| t.list != doomed));
    }

    #[test]
    fn test_delete_task_pulls_order() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let list_id = data.lists[0].id.clone();
        let task_id = data.lists[0].task_order[0].clone();
        store.delete_task("u1", &task_id).unwrap();

        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let list = fresh.lists.iter().find(|l| l.id == list_id).unwrap();
        assert!(!list.task_order.contains(&task_id));
    }

    #[test]
    fn test_board_data_repairs_orphaned_order() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let list_id = data.lists[0].id.clone();
        let mut corrupted = data.lists[0].task_order.clone();
        corrupted.push("ghost-task".to_string());
        store
            .update_list("u1", &list_id, None, Some(corrupted))
            .unwrap();

        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let list = fresh.lists.iter().find(|l| l.id == list_id).unwrap();
        assert!(!list.task_order.iter().any(|id| id == "ghost-task"));
        // The repair was written back, not just returned
        let again = store.board_data("u1", &data.board.id).unwrap();
        let list = again.lists.iter().find(|l| l.id == list_id).unwrap();
        assert!(!list.task_order.iter().any(|id| id == "ghost-task"));
    }

    #[test]
    fn test_update_task_reassignment_moves_order_entry() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let source = data.lists[0].id.clone();
        let dest = data.lists[1].id.clone();
        let task_id = data.lists[0].task_order[0].clone();

        store
            .update_task(
                "u1",
                &task_id,
                TaskUpdate {
                    list: Some(dest.clone()),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();

        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let src = fresh.lists.iter().find(|l| l.id == source).unwrap();
        let dst = fresh.lists.iter().find(|l| l.id == dest).unwrap();
        assert!(!src.task_order.contains(&task_id));
        assert_eq!(
            dst.task_order.iter().filter(|id| **id == task_id).count(),
            1
        );
        let task = fresh.tasks.iter().find(|t| t.id == task_id).unwrap();
        assert_eq!(task.list, dest);
    }

    #[test]
    fn test_create_task_dedups_labels() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let list_id = data.lists[0].id.clone();
        let task = store
            .create_task(
                "u1",
                &list_id,
                NewTask {
                    title: "Ship".into(),
                    labels: vec!["a".into(), "b".into(), "a".into()],
                    ..NewTask::default()
                },
            )
            .unwrap();
        assert_eq!(task.labels, vec!["a", "b"]);
    }

    #[test]
    fn test_create_task_requires_title() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let list_id = data.lists[0].id.clone();
        assert!(matches!(
            store.create_task("u1", &list_id, NewTask::default()),
            Err(StoreError::MissingTitle)
        ));
    }

    #[test]
    fn test_update_board_replaces_layout() {
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let mut reversed = data.board.list_order.clone();
        reversed.reverse();
        let board = store
            .update_board("u1", &data.board.id, None, Some(reversed.clone()))
            .unwrap();
        assert_eq!(board.list_order, reversed);
    }

    #[test]
    fn test_persist_task_owner_does_not_duplicate() {
        // The client persists the destination order (already containing the
        // task) before the owner update arrives; the owner update must not
        // append a second copy.
        let store = MemStore::new();
        let data = store.create_board("u1", "B").unwrap();
        let source = data.lists[0].id.clone();
        let dest = data.lists[1].id.clone();
        let task_id = data.lists[0].task_order[0].clone();

        let mut dest_order = data.lists[1].task_order.clone();
        dest_order.insert(0, task_id.clone());
        store.persist_list_order(&dest, &dest_order).unwrap();
        store.persist_task_owner(&task_id, &dest).unwrap();

        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let dst = fresh.lists.iter().find(|l| l.id == dest).unwrap();
        assert_eq!(
            dst.task_order.iter().filter(|id| **id == task_id).count(),
            1
        );
        let src = fresh.lists.iter().find(|l| l.id == source).unwrap();
        assert!(!src.task_order.contains(&task_id));
    }
}

/// A core `BoardSession` driven against the store through the
/// `BoardPersistence` seam, end to end.
#[cfg(test)]
mod engine_tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use taskdeck_core::moves::{MoveEvent, MoveKind};
    use taskdeck_core::session::BoardSession;
    use taskdeck_core::sync::DEFAULT_QUIET_PERIOD;

    fn task_move(id: &str, src: &str, src_idx: usize, dst: &str, dst_idx: usize) -> MoveEvent {
        MoveEvent {
            moved_id: id.to_string(),
            kind: MoveKind::Task,
            source_container: src.to_string(),
            source_index: src_idx,
            dest_container: dst.to_string(),
            dest_index: dst_idx,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cross_list_move_round_trips_through_store() {
        let store = Arc::new(MemStore::new());
        let data = store.create_board("u1", "Sprint").unwrap();
        let todo = data.lists[0].id.clone();
        let doing = data.lists[1].id.clone();
        let moved = data.lists[0].task_order[0].clone();

        let (mut session, _rx) =
            BoardSession::load(store.clone(), &data.board.id, DEFAULT_QUIET_PERIOD).unwrap();
        session.apply_move(&task_move(&moved, &todo, 0, &doing, 1)).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let task = fresh.tasks.iter().find(|t| t.id == moved).unwrap();
        assert_eq!(task.list, doing);
        let src = fresh.lists.iter().find(|l| l.id == todo).unwrap();
        let dst = fresh.lists.iter().find(|l| l.id == doing).unwrap();
        assert!(!src.task_order.contains(&moved));
        assert_eq!(dst.task_order.iter().filter(|id| **id == moved).count(), 1);
        assert_eq!(dst.task_order[1], moved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_load_repairs_corrupted_store_order() {
        let store = Arc::new(MemStore::new());
        let data = store.create_board("u1", "Sprint").unwrap();
        let list_id = data.lists[0].id.clone();
        let mut corrupted = data.lists[0].task_order.clone();
        corrupted.insert(0, "ghost".to_string());
        store
            .update_list("u1", &list_id, None, Some(corrupted))
            .unwrap();

        let (session, _rx) =
            BoardSession::load(store.clone(), &data.board.id, DEFAULT_QUIET_PERIOD).unwrap();
        let visible: Vec<&str> = session
            .ordered_tasks(&list_id)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert!(!visible.contains(&"ghost"));

        tokio::time::sleep(Duration::from_millis(10)).await;
        let fresh = store.board_data("u1", &data.board.id).unwrap();
        let list = fresh.lists.iter().find(|l| l.id == list_id).unwrap();
        assert!(!list.task_order.iter().any(|id| id == "ghost"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_reorder_debounces_into_store() {
        let store = Arc::new(MemStore::new());
        let data = store.create_board("u1", "Sprint").unwrap();
        let board_id = data.board.id.clone();
        let (mut session, _rx) =
            BoardSession::load(store.clone(), &board_id, DEFAULT_QUIET_PERIOD).unwrap();

        let first = data.board.list_order[0].clone();
        session
            .apply_move(&MoveEvent {
                moved_id: first.clone(),
                kind: MoveKind::List,
                source_container: board_id.clone(),
                source_index: 0,
                dest_container: board_id.clone(),
                dest_index: 2,
            })
            .unwrap();

        // Still the old layout inside the quiet period
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mid = store.board_data("u1", &board_id).unwrap();
        assert_eq!(mid.board.list_order[0], first);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let fresh = store.board_data("u1", &board_id).unwrap();
        assert_eq!(fresh.board.list_order[2], first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_delete_list_cascades_into_store() {
        let store = Arc::new(MemStore::new());
        let data = store.create_board("u1", "Sprint").unwrap();
        let doomed = data.lists[0].id.clone();
        let (mut session, _rx) =
            BoardSession::load(store.clone(), &data.board.id, DEFAULT_QUIET_PERIOD).unwrap();

        session.delete_list(&doomed).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let fresh = store.board_data("u1", &data.board.id).unwrap();
        assert!(fresh.lists.iter().all(|l| l.id != doomed));
        assert!(fresh.tasks.iter().all(|t| t.list != doomed));
        assert!(!fresh.board.list_order.contains(&doomed));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority. Serialized lowercase to match the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

/// Top-level container of lists.
///
/// `list_order` is the persisted display order. It may reference lists that
/// were deleted elsewhere and may miss lists created by another client —
/// it is repaired on load, never trusted blindly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub list_order: Vec<String>,
}

/// Ordered container of tasks within a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    /// Owning board id.
    pub board: String,
    pub title: String,
    /// Persisted task display order; may reference deleted tasks.
    #[serde(default)]
    pub task_order: Vec<String>,
}

/// A unit of work with priority, due date, and labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Owning board id.
    pub board: String,
    /// Owning list id. Must agree with the list whose `task_order` contains
    /// this task within one persistence round-trip of any move.
    pub list: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl Task {
    /// Add a label, ignoring duplicates. Insertion order is preserved.
    pub fn add_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }

    pub fn remove_label(&mut self, label: &str) {
        self.labels.retain(|l| l != label);
    }
}

/// Deduplicate labels in place, keeping the first occurrence of each.
/// Source data may carry duplicates; they are collapsed on add.
pub fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// Full payload of a board fetch: the board plus all of its lists and tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub board: Board,
    pub lists: Vec<TaskList>,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_defaults_to_medium() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","board":"b1","list":"l1","title":"Write docs"}"#,
        )
        .unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.labels.is_empty());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"urgent\"");
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_add_label_dedups() {
        let mut task = Task {
            id: "t1".into(),
            board: "b1".into(),
            list: "l1".into(),
            title: "Ship it".into(),
            description: None,
            due_date: None,
            priority: Priority::default(),
            labels: Vec::new(),
        };
        task.add_label("backend");
        task.add_label("urgent");
        task.add_label("backend");
        assert_eq!(task.labels, vec!["backend", "urgent"]);
    }

    #[test]
    fn test_dedup_labels_keeps_first_occurrence() {
        let labels = vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ];
        assert_eq!(dedup_labels(labels), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_camel_case_order_fields() {
        let board = Board {
            id: "b1".into(),
            title: "Roadmap".into(),
            list_order: vec!["l1".into(), "l2".into()],
        };
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["listOrder"], serde_json::json!(["l1", "l2"]));
    }
}

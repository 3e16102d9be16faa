//! Domain types & pure board logic for kanfile.

/// Textual exports of the task collection.
pub mod export;
/// Identifier types.
pub mod id;
/// Import of previously exported JSON payloads.
pub mod import;
/// Status and priority enumerations.
pub mod state;
/// Aggregate board statistics.
pub mod stats;
/// Named task templates with placeholder substitution.
pub mod template;
/// Case-insensitive task search.
pub mod text_matcher;
/// Pure derived views over a task list.
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

pub use id::TaskId;
pub use state::{Priority, Status};
pub use text_matcher::TextMatcher;
pub use view::{DueFilter, TaskFilter};

/// A single unit of work tracked on the board.
///
/// Field names serialize in camelCase with RFC 3339 timestamps; this is both
/// the persisted layout and the record shape of the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned at creation and never reassigned.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Optional description in Markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column bucket the task currently occupies.
    pub status: Status,
    /// Priority level. Records persisted before priorities existed load as medium.
    #[serde(default)]
    pub priority: Priority,
    /// Creation timestamp in UTC. Immutable after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optional due date.
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<OffsetDateTime>,
    /// Free-text labels.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl Task {
    /// Materialize a draft into a task, assigning a fresh id and the
    /// creation timestamp.
    #[must_use]
    pub fn from_draft(draft: TaskDraft, now: OffsetDateTime) -> Self {
        let TaskDraft {
            title,
            description,
            status,
            priority,
            due_date,
            tags,
        } = draft;
        Self {
            id: TaskId::new(),
            title,
            description,
            status,
            priority,
            created_at: now,
            due_date,
            tags,
        }
    }
}

/// Fields supplied when creating a task; the board assigns the id and
/// creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    /// Title of the new task.
    pub title: String,
    /// Optional description in Markdown.
    pub description: Option<String>,
    /// Column the task starts in.
    pub status: Status,
    /// Priority of the new task.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<OffsetDateTime>,
    /// Labels attached from the start.
    pub tags: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn draft_materializes_with_fresh_id_and_timestamp() {
        let now = datetime!(2025-06-01 12:00 UTC);
        let draft = TaskDraft {
            title: "Write release notes".into(),
            priority: Priority::High,
            ..TaskDraft::default()
        };
        let task = Task::from_draft(draft, now);
        assert!(!task.id.as_str().is_empty());
        assert_eq!(task.created_at, now);
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn serialized_records_use_camel_case_and_rfc3339() {
        let task = Task {
            id: "a1".parse().unwrap_or_else(|err| panic!("must parse id: {err}")),
            title: "Ship it".into(),
            description: None,
            status: Status::InProgress,
            priority: Priority::Low,
            created_at: datetime!(2025-06-01 12:00 UTC),
            due_date: Some(datetime!(2025-06-03 12:00 UTC)),
            tags: BTreeSet::from(["release".to_owned()]),
        };
        let json = serde_json::to_string(&task).unwrap_or_else(|err| panic!("must serialize: {err}"));
        assert!(json.contains("\"createdAt\":\"2025-06-01T12:00:00Z\""));
        assert!(json.contains("\"dueDate\":\"2025-06-03T12:00:00Z\""));
        assert!(json.contains("\"status\":\"in-progress\""));
    }

    #[test]
    fn records_without_priority_load_as_medium() {
        let json = r#"{
            "id": "legacy",
            "title": "Old record",
            "status": "todo",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap_or_else(|err| panic!("must parse: {err}"));
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
    }
}

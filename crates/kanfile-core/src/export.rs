//! Textual exports of the task collection.
//!
//! All three formats are pure functions of the task list: JSON for
//! re-importing, CSV for spreadsheets, Markdown for humans.

use crate::state::Status;
use crate::view::by_status;
use crate::Task;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Version tag embedded in JSON exports.
pub const EXPORT_VERSION: &str = "1.0";

/// Column headers of the CSV export, in order.
pub const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Title",
    "Description",
    "Status",
    "Priority",
    "Created At",
    "Due Date",
    "Tags",
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Errors raised while producing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The task list failed to serialize.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A timestamp failed to format.
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    export_date: String,
    version: &'static str,
    tasks: &'a [Task],
}

/// Render the JSON export: `{exportDate, version, tasks[]}` with RFC 3339
/// timestamps, pretty-printed.
///
/// # Errors
/// Returns an error if a timestamp fails to format or serialization fails.
pub fn to_json(tasks: &[Task], now: OffsetDateTime) -> Result<String, ExportError> {
    let document = ExportDocument {
        export_date: now.format(&Rfc3339)?,
        version: EXPORT_VERSION,
        tasks,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render the CSV export with the fixed eight-column header.
///
/// Fields containing commas, quotes, or line breaks are quoted with doubled
/// inner quotes, per RFC 4180.
///
/// # Errors
/// Returns an error if a timestamp fails to format.
pub fn to_csv(tasks: &[Task]) -> Result<String, ExportError> {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for task in tasks {
        let due = task.due_date.map(|due| due.format(&Rfc3339)).transpose()?;
        let tags = task.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        let row = [
            csv_field(task.id.as_str()),
            csv_field(&task.title),
            csv_field(task.description.as_deref().unwrap_or_default()),
            csv_field(task.status.as_str()),
            csv_field(task.priority.as_str()),
            csv_field(&task.created_at.format(&Rfc3339)?),
            csv_field(due.as_deref().unwrap_or_default()),
            csv_field(&tags),
        ]
        .join(",");
        lines.push(row);
    }
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render the Markdown export: a header with date and total count, then one
/// section per non-empty column with emoji markers and a metadata block per
/// task.
///
/// # Errors
/// Returns an error if a timestamp fails to format.
pub fn to_markdown(tasks: &[Task], now: OffsetDateTime) -> Result<String, ExportError> {
    let mut out = String::from("# Task Export\n\n");
    out.push_str(&format!("**Export Date:** {}\n", now.format(DATE_FORMAT)?));
    out.push_str(&format!("**Total Tasks:** {}\n\n", tasks.len()));

    for status in Status::COLUMNS {
        let bucket = by_status(tasks, status);
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "## {} {} ({})\n\n",
            status.emoji(),
            status.display_name(),
            bucket.len()
        ));
        for task in bucket {
            out.push_str(&format!("### {} {}\n\n", task.priority.emoji(), task.title));
            if let Some(description) = &task.description {
                out.push_str(description);
                out.push_str("\n\n");
            }
            out.push_str("**Details:**\n");
            out.push_str(&format!("- Priority: {}\n", task.priority.display_name()));
            out.push_str(&format!("- Created: {}\n", task.created_at.format(DATE_FORMAT)?));
            if let Some(due) = task.due_date {
                out.push_str(&format!("- Due: {}\n", due.format(DATE_FORMAT)?));
            }
            if !task.tags.is_empty() {
                let tags: Vec<String> = task.tags.iter().map(|tag| format!("`{tag}`")).collect();
                out.push_str(&format!("- Tags: {}\n", tags.join(", ")));
            }
            out.push_str("\n---\n\n");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Priority;
    use crate::TaskDraft;
    use std::collections::BTreeSet;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-10 12:00 UTC);

    fn sample_tasks() -> Vec<Task> {
        let mut plain = Task::from_draft(
            TaskDraft {
                title: "Ship release".into(),
                status: Status::Todo,
                priority: Priority::High,
                due_date: Some(datetime!(2025-06-12 12:00 UTC)),
                tags: BTreeSet::from(["release".to_owned()]),
                ..TaskDraft::default()
            },
            datetime!(2025-06-01 08:00 UTC),
        );
        plain.id = "t1".parse().unwrap_or_else(|err| panic!("must parse id: {err}"));

        let mut tricky = Task::from_draft(
            TaskDraft {
                title: "Quote \"this\", please".into(),
                description: Some("line one\nline two".into()),
                status: Status::Done,
                priority: Priority::Low,
                ..TaskDraft::default()
            },
            datetime!(2025-06-02 08:00 UTC),
        );
        tricky.id = "t2".parse().unwrap_or_else(|err| panic!("must parse id: {err}"));

        vec![plain, tricky]
    }

    #[test]
    fn json_export_carries_date_version_and_tasks() {
        let json = to_json(&sample_tasks(), NOW).unwrap_or_else(|err| panic!("must export: {err}"));
        let value: serde_json::Value =
            serde_json::from_str(&json).unwrap_or_else(|err| panic!("must reparse: {err}"));
        assert_eq!(value["exportDate"], "2025-06-10T12:00:00Z");
        assert_eq!(value["version"], EXPORT_VERSION);
        assert_eq!(value["tasks"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["tasks"][0]["createdAt"], "2025-06-01T08:00:00Z");
    }

    #[test]
    fn csv_starts_with_the_fixed_header() {
        let csv = to_csv(&sample_tasks()).unwrap_or_else(|err| panic!("must export: {err}"));
        let header = csv.lines().next().unwrap_or_default();
        assert_eq!(header, "ID,Title,Description,Status,Priority,Created At,Due Date,Tags");
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_doubles_quotes() {
        let csv = to_csv(&sample_tasks()).unwrap_or_else(|err| panic!("must export: {err}"));
        assert!(csv.contains("\"Quote \"\"this\"\", please\""));
        // Plain fields stay unquoted.
        assert!(csv.contains("t1,Ship release,"));
    }

    #[test]
    fn markdown_groups_by_status_with_markers() {
        let md = to_markdown(&sample_tasks(), NOW).unwrap_or_else(|err| panic!("must export: {err}"));
        assert!(md.starts_with("# Task Export\n\n**Export Date:** 2025-06-10\n**Total Tasks:** 2\n"));
        assert!(md.contains("## ⏳ To Do (1)"));
        assert!(md.contains("## ✅ Done (1)"));
        assert!(md.contains("### 🔴 Ship release"));
        assert!(md.contains("- Tags: `release`"));
        // Empty columns are omitted entirely.
        assert!(!md.contains("In Progress"));
    }
}

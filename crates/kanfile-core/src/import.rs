//! Import of previously exported JSON payloads.
//!
//! Only the JSON export shape is accepted. Records are parsed through an
//! explicit schema: required fields must be present and non-empty, enum
//! tokens and timestamps must parse, and anything else is rejected with the
//! offending record index instead of being spread into the collection.

use crate::id::TaskId;
use crate::state::{Priority, Status};
use crate::Task;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Errors raised while importing a payload.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Structurally invalid payload: not JSON, or no `tasks` array.
    #[error("invalid import payload: {reason}")]
    Format {
        /// Why the payload shape was rejected.
        reason: String,
    },
    /// Well-formed payload containing a semantically incomplete record.
    #[error("task {index}: {violation}")]
    Validation {
        /// Zero-based index of the offending record in the `tasks` array.
        index: usize,
        /// Description of the violated requirement.
        violation: String,
    },
}

/// Result of a successful import parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Records whose id was not already on the board, in payload order.
    pub tasks: Vec<Task>,
    /// Count of records skipped because their id already existed.
    pub skipped: usize,
}

/// Parse an export payload against the current collection.
///
/// Records whose id is already present in `existing` (or duplicated within
/// the payload itself) are skipped, never overwritten. Records without a
/// `createdAt` are stamped with `now`.
///
/// # Errors
/// Returns [`ImportError::Format`] when the payload is not a JSON object
/// with a `tasks` array, and [`ImportError::Validation`] when any record is
/// missing a required field or carries an unparseable value.
pub fn from_json(
    payload: &str,
    existing: &BTreeSet<TaskId>,
    now: OffsetDateTime,
) -> Result<ImportOutcome, ImportError> {
    let document: Value = serde_json::from_str(payload).map_err(|err| ImportError::Format {
        reason: err.to_string(),
    })?;
    let records = document
        .get("tasks")
        .and_then(Value::as_array)
        .ok_or_else(|| ImportError::Format {
            reason: "a `tasks` array is required".to_owned(),
        })?;

    let mut seen: BTreeSet<TaskId> = existing.clone();
    let mut tasks = Vec::new();
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        let task = parse_record(index, record, now)?;
        if seen.contains(&task.id) {
            skipped += 1;
            continue;
        }
        seen.insert(task.id.clone());
        tasks.push(task);
    }

    Ok(ImportOutcome { tasks, skipped })
}

fn parse_record(index: usize, record: &Value, now: OffsetDateTime) -> Result<Task, ImportError> {
    let record = record.as_object().ok_or_else(|| violation(index, "record must be a JSON object"))?;

    let id: TaskId = required_str(index, record, "id")?
        .parse()
        .map_err(|_| violation(index, "missing required field `id`"))?;
    let title = required_str(index, record, "title")?.to_owned();
    let status: Status = required_str(index, record, "status")?
        .parse()
        .map_err(|err| violation(index, format!("{err}")))?;
    let priority: Priority = required_str(index, record, "priority")?
        .parse()
        .map_err(|err| violation(index, format!("{err}")))?;

    let description = optional_str(index, record, "description")?.map(str::to_owned);
    let created_at = optional_str(index, record, "createdAt")?
        .map(|raw| parse_timestamp(index, "createdAt", raw))
        .transpose()?
        .unwrap_or(now);
    let due_date = optional_str(index, record, "dueDate")?
        .map(|raw| parse_timestamp(index, "dueDate", raw))
        .transpose()?;
    let tags = parse_tags(index, record)?;

    Ok(Task {
        id,
        title,
        description,
        status,
        priority,
        created_at,
        due_date,
        tags,
    })
}

fn required_str<'a>(
    index: usize,
    record: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, ImportError> {
    match record.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value),
        Some(Value::Null) | None => Err(violation(index, format!("missing required field `{field}`"))),
        Some(Value::String(_)) => Err(violation(index, format!("field `{field}` must not be empty"))),
        Some(_) => Err(violation(index, format!("field `{field}` must be a string"))),
    }
}

fn optional_str<'a>(
    index: usize,
    record: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, ImportError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(violation(index, format!("field `{field}` must be a string"))),
    }
}

fn parse_timestamp(index: usize, field: &str, raw: &str) -> Result<OffsetDateTime, ImportError> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|_| violation(index, format!("invalid {field}: {raw}")))
}

fn parse_tags(index: usize, record: &Map<String, Value>) -> Result<BTreeSet<String>, ImportError> {
    match record.get("tags") {
        None | Some(Value::Null) => Ok(BTreeSet::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| violation(index, "field `tags` must be an array of strings"))
            })
            .collect(),
        Some(_) => Err(violation(index, "field `tags` must be an array of strings")),
    }
}

fn violation(index: usize, message: impl Into<String>) -> ImportError {
    ImportError::Validation {
        index,
        violation: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-10 12:00 UTC);

    fn no_existing() -> BTreeSet<TaskId> {
        BTreeSet::new()
    }

    #[test]
    fn minimal_record_imports_with_defaults() {
        let payload = r#"{"tasks":[{"id":"a","title":"X","status":"todo","priority":"low"}]}"#;
        let outcome = from_json(payload, &no_existing(), NOW)
            .unwrap_or_else(|err| panic!("must import: {err}"));
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.skipped, 0);
        let task = &outcome.tasks[0];
        assert_eq!(task.created_at, NOW);
        assert!(task.due_date.is_none());
        assert!(task.tags.is_empty());
    }

    #[test]
    fn payloads_without_a_tasks_array_are_format_errors() {
        for payload in ["not json", "[]", "{}", r#"{"tasks": 5}"#] {
            let err = from_json(payload, &no_existing(), NOW).expect_err("payload must be rejected");
            assert!(matches!(err, ImportError::Format { .. }), "payload {payload:?}");
        }
    }

    #[test]
    fn missing_required_fields_name_the_record() {
        let payload = r#"{"tasks":[
            {"id":"a","title":"X","status":"todo","priority":"low"},
            {"id":"b","status":"todo","priority":"low"}
        ]}"#;
        let err = from_json(payload, &no_existing(), NOW).expect_err("payload must be rejected");
        match err {
            ImportError::Validation { index, violation } => {
                assert_eq!(index, 1);
                assert!(violation.contains("`title`"), "violation was: {violation}");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn unknown_status_tokens_are_rejected() {
        let payload = r#"{"tasks":[{"id":"a","title":"X","status":"doing","priority":"low"}]}"#;
        let err = from_json(payload, &no_existing(), NOW).expect_err("payload must be rejected");
        assert!(err.to_string().contains("invalid status: doing"));
    }

    #[test]
    fn malformed_timestamps_are_rejected() {
        let payload = r#"{"tasks":[
            {"id":"a","title":"X","status":"todo","priority":"low","dueDate":"next tuesday"}
        ]}"#;
        let err = from_json(payload, &no_existing(), NOW).expect_err("payload must be rejected");
        assert!(err.to_string().contains("invalid dueDate"));
    }

    #[test]
    fn existing_ids_are_skipped_silently() {
        let existing: BTreeSet<TaskId> = ["a".parse::<TaskId>()]
            .into_iter()
            .map(|id| id.unwrap_or_else(|err| panic!("must parse id: {err}")))
            .collect();
        let payload = r#"{"tasks":[
            {"id":"a","title":"X","status":"todo","priority":"low"},
            {"id":"b","title":"Y","status":"done","priority":"high"}
        ]}"#;
        let outcome = from_json(payload, &existing, NOW)
            .unwrap_or_else(|err| panic!("must import: {err}"));
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.tasks[0].id.as_str(), "b");
    }

    #[test]
    fn duplicates_within_the_payload_are_skipped() {
        let payload = r#"{"tasks":[
            {"id":"a","title":"first","status":"todo","priority":"low"},
            {"id":"a","title":"second","status":"done","priority":"high"}
        ]}"#;
        let outcome = from_json(payload, &no_existing(), NOW)
            .unwrap_or_else(|err| panic!("must import: {err}"));
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.tasks[0].title, "first");
    }
}

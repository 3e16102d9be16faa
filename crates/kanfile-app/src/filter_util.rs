use kanfile_core::{DueFilter, Priority, Status, TaskFilter};
use thiserror::Error;

/// Error type returned while constructing task filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// The priority token named no priority.
    #[error("invalid priority: {token}")]
    InvalidPriority {
        /// The rejected input token.
        token: String,
    },
    /// The status token named no column.
    #[error("invalid status: {token}")]
    InvalidStatus {
        /// The rejected input token.
        token: String,
    },
    /// The due token named no due-date bucket.
    #[error("invalid due filter: {token} (expected all, overdue, due-today, due-week, or no-due-date)")]
    InvalidDueFilter {
        /// The rejected input token.
        token: String,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a
/// [`TaskFilter`]. The token `all` (or a blank string) leaves a stage
/// unrestricted.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    text: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text.and_then(normalize_token);
        self
    }

    /// Configure the priority stage.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = priority.and_then(normalize_token);
        self
    }

    /// Configure the status stage.
    #[must_use]
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status.and_then(normalize_token);
        self
    }

    /// Configure the due-date bucket stage.
    #[must_use]
    pub fn with_due(mut self, due: Option<String>) -> Self {
        self.due = due.and_then(normalize_token);
        self
    }

    /// Build the final [`TaskFilter`].
    ///
    /// # Errors
    /// Returns an error if any token cannot be mapped to its stage.
    pub fn build(self) -> FilterBuildResult<TaskFilter> {
        let priority = match self.priority.as_deref() {
            None | Some("all") => None,
            Some(token) => Some(token.parse::<Priority>().map_err(|_| {
                FilterBuildError::InvalidPriority {
                    token: token.to_owned(),
                }
            })?),
        };
        let status = match self.status.as_deref() {
            None | Some("all") => None,
            Some(token) => Some(token.parse::<Status>().map_err(|_| {
                FilterBuildError::InvalidStatus {
                    token: token.to_owned(),
                }
            })?),
        };
        let due = match self.due.as_deref() {
            None | Some("all") => DueFilter::All,
            Some(token) => parse_due_token(token)?,
        };

        Ok(TaskFilter {
            text: self.text,
            priority,
            status,
            due,
        })
    }
}

fn normalize_token(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_due_token(token: &str) -> FilterBuildResult<DueFilter> {
    let normalized = token.to_ascii_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "overdue" => Ok(DueFilter::Overdue),
        "due-today" | "today" => Ok(DueFilter::DueToday),
        "due-week" | "week" => Ok(DueFilter::DueWeek),
        "no-due-date" | "none" => Ok(DueFilter::WithoutDueDate),
        _ => Err(FilterBuildError::InvalidDueFilter {
            token: token.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_becomes_none() {
        let filter = TaskFilterBuilder::new()
            .with_text(Some("   ".into()))
            .build()
            .unwrap_or_else(|err| panic!("must build: {err}"));
        assert!(filter.text.is_none());
        assert!(filter.is_empty());
    }

    #[test]
    fn all_tokens_leave_stages_unrestricted() {
        let filter = TaskFilterBuilder::new()
            .with_priority(Some("all".into()))
            .with_status(Some("all".into()))
            .with_due(Some("all".into()))
            .build()
            .unwrap_or_else(|err| panic!("must build: {err}"));
        assert!(filter.is_empty());
    }

    #[test]
    fn tokens_normalize_into_stages() {
        let filter = TaskFilterBuilder::new()
            .with_text(Some(" crash ".into()))
            .with_priority(Some("HIGH".into()))
            .with_status(Some("In Progress".into()))
            .with_due(Some("due_week".into()))
            .build()
            .unwrap_or_else(|err| panic!("must build: {err}"));
        assert_eq!(filter.text.as_deref(), Some("crash"));
        assert_eq!(filter.priority, Some(Priority::High));
        assert_eq!(filter.status, Some(Status::InProgress));
        assert_eq!(filter.due, DueFilter::DueWeek);
    }

    #[test]
    fn unknown_tokens_are_rejected_with_the_original_input() {
        let err = TaskFilterBuilder::new()
            .with_due(Some("someday".into()))
            .build()
            .expect_err("token must be rejected");
        assert!(matches!(err, FilterBuildError::InvalidDueFilter { token } if token == "someday"));
    }
}

use crate::Task;

/// Case-insensitive substring matcher for task fields.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Determine whether any textual field on the task contains the query.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || task
                .description
                .as_deref()
                .is_some_and(|description| self.matches_field(description))
            || task.tags.iter().any(|tag| self.matches_field(tag))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, Status, TaskDraft};
    use std::collections::BTreeSet;
    use time::macros::datetime;

    fn task(title: &str, description: Option<&str>, tags: &[&str]) -> Task {
        Task::from_draft(
            TaskDraft {
                title: title.into(),
                description: description.map(str::to_owned),
                status: Status::Todo,
                priority: Priority::Medium,
                due_date: None,
                tags: tags.iter().map(|&t| t.to_owned()).collect::<BTreeSet<_>>(),
            },
            datetime!(2025-01-01 00:00 UTC),
        )
    }

    #[test]
    fn matcher_skips_blank_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new("   ").is_none());
        assert!(TextMatcher::new("\n").is_none());
    }

    #[test]
    fn matcher_finds_text_across_fields() {
        let t = task(
            "Fix login crash",
            Some("Panics on empty password"),
            &["auth", "bug"],
        );

        for query in ["login", "PANICS", "Auth"] {
            let matcher = TextMatcher::new(query)
                .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
            assert!(matcher.matches(&t), "query {query:?} must match");
        }
    }

    #[test]
    fn matcher_is_case_insensitive() {
        let t = task("Improve CLI", None, &[]);

        let matcher = TextMatcher::new("cli")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(matcher.matches(&t));

        let missing = TextMatcher::new("api")
            .unwrap_or_else(|| panic!("matcher must exist for queries with content"));
        assert!(!missing.matches(&t));
    }
}

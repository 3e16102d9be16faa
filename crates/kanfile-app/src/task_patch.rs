use std::collections::BTreeSet;

use kanfile_core::{Priority, Status, Task};
use time::OffsetDateTime;

/// Difference between two sets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetDiff<T> {
    /// Entries present in the desired set but missing from the current set.
    pub added: Vec<T>,
    /// Entries present in the current set but removed from the desired set.
    pub removed: Vec<T>,
}

impl<T> SetDiff<T> {
    /// Returns true when both added/removed are empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute differences between two sets.
#[must_use]
pub fn diff_sets<T: Ord + Clone>(current: &BTreeSet<T>, desired: &BTreeSet<T>) -> SetDiff<T> {
    SetDiff {
        added: desired.difference(current).cloned().collect(),
        removed: current.difference(desired).cloned().collect(),
    }
}

/// Patch for the description body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionPatch {
    /// Overwrite with a new Markdown string.
    Set {
        /// Markdown description body.
        description: String,
    },
    /// Clear the description.
    Clear,
}

/// Patch for the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Overwrite with a new due date.
    Set {
        /// The new due date.
        due_date: OffsetDateTime,
    },
    /// Clear the due date.
    Clear,
}

/// Desired due-date change supplied by an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueDateEdit {
    /// Leave the due date as it is.
    #[default]
    Keep,
    /// Remove the due date.
    Clear,
    /// Replace the due date.
    Set(OffsetDateTime),
}

/// Normalized task edit fields used to compute diffs.
///
/// `None` fields leave the task unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskEditData {
    /// Desired task title.
    pub title: Option<String>,
    /// Desired column.
    pub status: Option<Status>,
    /// Desired priority.
    pub priority: Option<Priority>,
    /// Desired description body (`Some("")` clears).
    pub description: Option<String>,
    /// Desired due-date change.
    pub due_date: DueDateEdit,
    /// Desired tag set (`None` leaves unchanged).
    pub tags: Option<BTreeSet<String>>,
}

/// Diff between a task and target fields.
#[derive(Debug, Default)]
pub struct TaskPatch {
    /// Title change (if any).
    pub title: Option<String>,
    /// Column change (if any).
    pub status: Option<Status>,
    /// Priority change (if any).
    pub priority: Option<Priority>,
    /// Description change (if any).
    pub description: Option<DescriptionPatch>,
    /// Due date change (if any).
    pub due_date: Option<DueDatePatch>,
    /// Tag additions/removals.
    pub tags: SetDiff<String>,
}

impl TaskPatch {
    /// Compute a patch by comparing the task with the provided edits.
    #[must_use]
    pub fn from_task(task: &Task, data: TaskEditData) -> Self {
        let TaskEditData {
            title,
            status,
            priority,
            description,
            due_date,
            tags,
        } = data;

        let mut patch = Self {
            title: title.filter(|title| *title != task.title),
            status: status.filter(|status| *status != task.status),
            priority: priority.filter(|priority| *priority != task.priority),
            ..Self::default()
        };

        patch.description = description.and_then(|text| {
            if text.is_empty() {
                task.description.is_some().then_some(DescriptionPatch::Clear)
            } else if task.description.as_deref() == Some(text.as_str()) {
                None
            } else {
                Some(DescriptionPatch::Set { description: text })
            }
        });

        patch.due_date = match due_date {
            DueDateEdit::Keep => None,
            DueDateEdit::Clear => task.due_date.is_some().then_some(DueDatePatch::Clear),
            DueDateEdit::Set(due) => {
                (task.due_date != Some(due)).then_some(DueDatePatch::Set { due_date: due })
            }
        };

        if let Some(desired) = tags {
            patch.tags = diff_sets(&task.tags, &desired);
        }

        patch
    }

    /// Returns true when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.tags.is_empty()
    }

    /// Apply the patch in place. The task's id and creation time are never
    /// touched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        match &self.description {
            Some(DescriptionPatch::Set { description }) => {
                task.description = Some(description.clone());
            }
            Some(DescriptionPatch::Clear) => task.description = None,
            None => {}
        }
        match self.due_date {
            Some(DueDatePatch::Set { due_date }) => task.due_date = Some(due_date),
            Some(DueDatePatch::Clear) => task.due_date = None,
            None => {}
        }
        for removed in &self.tags.removed {
            task.tags.remove(removed);
        }
        for added in &self.tags.added {
            task.tags.insert(added.clone());
        }
    }
}

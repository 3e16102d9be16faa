//! Pure, referentially transparent views over a task list.
//!
//! Nothing here mutates the collection; time-dependent predicates take an
//! explicit `now` so results are reproducible.

use crate::id::TaskId;
use crate::state::{Priority, Status};
use crate::text_matcher::TextMatcher;
use crate::Task;
use time::{Duration, OffsetDateTime};

/// Stable filter of the tasks in one column, preserving relative order.
#[must_use]
pub fn by_status(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status == status).collect()
}

/// Case-insensitive substring search over title, description, and tags.
/// Blank queries return the input unchanged.
#[must_use]
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    TextMatcher::new(query).map_or_else(
        || tasks.iter().collect(),
        |matcher| tasks.iter().filter(|task| matcher.matches(task)).collect(),
    )
}

/// True iff the task has a due date strictly before `now`.
#[must_use]
pub fn is_overdue(task: &Task, now: OffsetDateTime) -> bool {
    task.due_date.is_some_and(|due| due < now)
}

/// True iff the due date falls within `[now, now + horizon_days]`, inclusive
/// of the upper bound.
#[must_use]
pub fn is_due_soon(task: &Task, horizon_days: i64, now: OffsetDateTime) -> bool {
    task.due_date
        .is_some_and(|due| due >= now && due <= now + Duration::days(horizon_days))
}

/// Concatenation of the columns in fixed order (todo, in-progress, done).
/// This is the canonical sequence for keyboard navigation.
#[must_use]
pub fn flatten(tasks: &[Task]) -> Vec<&Task> {
    Status::COLUMNS
        .iter()
        .flat_map(|&status| tasks.iter().filter(move |task| task.status == status))
        .collect()
}

/// Id of the task following `current` in the flattened sequence.
#[must_use]
pub fn next_task(tasks: &[Task], current: &TaskId) -> Option<TaskId> {
    let flat = flatten(tasks);
    let index = flat.iter().position(|task| &task.id == current)?;
    flat.get(index + 1).map(|task| task.id.clone())
}

/// Id of the task preceding `current` in the flattened sequence.
#[must_use]
pub fn previous_task(tasks: &[Task], current: &TaskId) -> Option<TaskId> {
    let flat = flatten(tasks);
    let index = flat.iter().position(|task| &task.id == current)?;
    index.checked_sub(1).and_then(|i| flat.get(i)).map(|task| task.id.clone())
}

/// Id of the first task in the flattened sequence.
#[must_use]
pub fn first_task(tasks: &[Task]) -> Option<TaskId> {
    flatten(tasks).first().map(|task| task.id.clone())
}

/// Id of the last task in the flattened sequence.
#[must_use]
pub fn last_task(tasks: &[Task]) -> Option<TaskId> {
    flatten(tasks).last().map(|task| task.id.clone())
}

/// Due-date bucket selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueFilter {
    /// No due-date restriction.
    #[default]
    All,
    /// Due date strictly in the past.
    Overdue,
    /// Due date on the current calendar day (UTC).
    DueToday,
    /// Due within the next seven days, today included.
    DueWeek,
    /// No due date at all.
    WithoutDueDate,
}

impl DueFilter {
    fn keeps(self, task: &Task, now: OffsetDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Overdue => is_overdue(task, now),
            Self::DueToday => task.due_date.is_some_and(|due| due.date() == now.date()),
            Self::DueWeek => is_due_soon(task, 7, now),
            Self::WithoutDueDate => task.due_date.is_none(),
        }
    }
}

/// Composed filter state of the search bar.
///
/// Stages apply in the fixed order search → priority → status → due bucket,
/// each operating on the previous stage's output. An unset stage passes its
/// input through unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Free-text search query.
    pub text: Option<String>,
    /// Restrict to one priority.
    pub priority: Option<Priority>,
    /// Restrict to one column.
    pub status: Option<Status>,
    /// Due-date bucket restriction.
    pub due: DueFilter,
}

impl TaskFilter {
    /// True when no stage restricts anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due == DueFilter::All
    }

    /// Apply all stages, preserving the input's relative order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task], now: OffsetDateTime) -> Vec<&'a Task> {
        let mut current = match self.text.as_deref() {
            Some(query) => search(tasks, query),
            None => tasks.iter().collect(),
        };
        if let Some(priority) = self.priority {
            current.retain(|task| task.priority == priority);
        }
        if let Some(status) = self.status {
            current.retain(|task| task.status == status);
        }
        if self.due != DueFilter::All {
            current.retain(|task| self.due.keeps(task, now));
        }
        current
    }
}

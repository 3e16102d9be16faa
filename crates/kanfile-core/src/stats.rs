//! Aggregate board statistics.

use crate::state::{Priority, Status};
use crate::view::{is_due_soon, is_overdue};
use crate::Task;
use serde::Serialize;
use time::OffsetDateTime;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Aggregated counters over the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardStats {
    /// Number of tasks on the board.
    pub total: usize,
    /// Tasks in the todo column.
    pub todo: usize,
    /// Tasks in the in-progress column.
    pub in_progress: usize,
    /// Tasks in the done column.
    pub done: usize,
    /// Tasks with a due date in the past.
    pub overdue: usize,
    /// Tasks due within the configured horizon.
    pub due_soon: usize,
    /// Tasks at high priority.
    pub high_priority: usize,
    /// Tasks at medium priority.
    pub medium_priority: usize,
    /// Tasks at low priority.
    pub low_priority: usize,
    /// Percentage of tasks in the done column, 0 for an empty board.
    pub completion_rate: f64,
    /// Mean age in whole days of completed tasks, creation to `now`.
    pub avg_completion_days: f64,
}

impl BoardStats {
    /// Compute statistics for the collection as of `now`.
    #[must_use]
    pub fn compute(tasks: &[Task], due_soon_horizon_days: i64, now: OffsetDateTime) -> Self {
        let count_status =
            |status: Status| tasks.iter().filter(|task| task.status == status).count();
        let count_priority =
            |priority: Priority| tasks.iter().filter(|task| task.priority == priority).count();

        let total = tasks.len();
        let done = count_status(Status::Done);
        let completion_rate = if total > 0 {
            percent(done, total)
        } else {
            0.0
        };

        let completed_ages: Vec<f64> = tasks
            .iter()
            .filter(|task| task.status == Status::Done)
            .map(|task| ((now - task.created_at).as_seconds_f64() / SECONDS_PER_DAY).ceil())
            .collect();
        let avg_completion_days = if completed_ages.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let len = completed_ages.len() as f64;
            completed_ages.iter().sum::<f64>() / len
        };

        Self {
            total,
            todo: count_status(Status::Todo),
            in_progress: count_status(Status::InProgress),
            done,
            overdue: tasks.iter().filter(|task| is_overdue(task, now)).count(),
            due_soon: tasks
                .iter()
                .filter(|task| is_due_soon(task, due_soon_horizon_days, now))
                .count(),
            high_priority: count_priority(Priority::High),
            medium_priority: count_priority(Priority::Medium),
            low_priority: count_priority(Priority::Low),
            completion_rate,
            avg_completion_days,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

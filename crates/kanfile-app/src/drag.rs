//! Two-phase drag gesture coordination.
//!
//! The coordinator tracks a single active gesture. Hovering computes a
//! *preview* status held on the gesture itself; the committed collection is
//! untouched until [`DragCoordinator::drop_on`] produces a [`DragEffect`]
//! for the board to apply. An abandoned gesture therefore never persists.

use kanfile_core::{Status, Task, TaskId};

/// Target currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Hovering the body of a column.
    Column(Status),
    /// Hovering another task's card.
    Task(TaskId),
}

/// Effect a completed gesture applies to the committed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    /// Reassign the dragged task to a new column, keeping its array position.
    Move {
        /// The dragged task.
        id: TaskId,
        /// Column to assign.
        status: Status,
    },
    /// Remove the task at `from` and reinsert it at `to` (interpreted after
    /// the removal), optionally committing a column change picked up while
    /// hovering.
    Reorder {
        /// Index of the dragged task in the committed collection.
        from: usize,
        /// Index of the hovered task in the committed collection.
        to: usize,
        /// Column change to commit together with the reorder.
        status: Option<Status>,
    },
    /// Gesture discarded with no mutation.
    Cancelled,
}

#[derive(Debug)]
struct Gesture {
    task: TaskId,
    origin: Status,
    preview: Option<Status>,
}

impl Gesture {
    fn effective_status(&self) -> Status {
        self.preview.unwrap_or(self.origin)
    }
}

/// State machine over a single active drag gesture.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    active: Option<Gesture>,
}

impl DragCoordinator {
    /// Coordinator with no active gesture.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Begin dragging a task, implicitly cancelling any prior incomplete
    /// gesture. Returns false when the id names no task.
    pub fn begin(&mut self, tasks: &[Task], id: &TaskId) -> bool {
        self.active = tasks.iter().find(|task| &task.id == id).map(|task| Gesture {
            task: task.id.clone(),
            origin: task.status,
            preview: None,
        });
        self.active.is_some()
    }

    /// Id of the task being dragged, if a gesture is active.
    #[must_use]
    pub fn dragging(&self) -> Option<&TaskId> {
        self.active.as_ref().map(|gesture| &gesture.task)
    }

    /// Non-committed column shown for the dragged task while the gesture is
    /// in flight. `None` when the task is not being dragged or no preview
    /// differs from its origin.
    #[must_use]
    pub fn preview_status(&self, id: &TaskId) -> Option<Status> {
        self.active
            .as_ref()
            .filter(|gesture| &gesture.task == id)
            .and_then(|gesture| gesture.preview)
    }

    /// Update the live preview for the hovered target.
    ///
    /// Hovering a column, or a task, whose status differs from the
    /// gesture's current effective status retargets the preview; anything
    /// else leaves it in place.
    pub fn hover(&mut self, tasks: &[Task], target: Option<&DropTarget>) {
        let Some(gesture) = &mut self.active else {
            return;
        };
        let effective = gesture.effective_status();
        match target {
            Some(DropTarget::Column(status)) if *status != effective => {
                gesture.preview = Some(*status);
            }
            Some(DropTarget::Task(over_id)) if *over_id != gesture.task => {
                if let Some(over) = tasks.iter().find(|task| &task.id == over_id) {
                    if over.status != effective {
                        gesture.preview = Some(over.status);
                    }
                }
            }
            _ => {}
        }
    }

    /// Complete the gesture over `target`, producing the effect to commit.
    ///
    /// The target counts as a final hover, so a drop without an intervening
    /// hover behaves identically to hover-then-drop. A missing target
    /// discards the gesture with no mutation.
    pub fn drop_on(&mut self, tasks: &[Task], target: Option<&DropTarget>) -> DragEffect {
        self.hover(tasks, target);
        let Some(gesture) = self.active.take() else {
            return DragEffect::Cancelled;
        };
        let Some(target) = target else {
            return DragEffect::Cancelled;
        };
        let Some(from) = tasks.iter().position(|task| task.id == gesture.task) else {
            return DragEffect::Cancelled;
        };

        let effective = gesture.effective_status();
        match target {
            DropTarget::Task(over_id) if *over_id != gesture.task => {
                let Some(to) = tasks.iter().position(|task| &task.id == over_id) else {
                    return DragEffect::Cancelled;
                };
                let over_status = tasks.get(to).map_or(effective, |task| task.status);
                if over_status == effective {
                    DragEffect::Reorder {
                        from,
                        to,
                        status: (effective != gesture.origin).then_some(effective),
                    }
                } else {
                    DragEffect::Move {
                        id: gesture.task,
                        status: over_status,
                    }
                }
            }
            DropTarget::Column(status) if *status != gesture.origin => DragEffect::Move {
                id: gesture.task,
                status: *status,
            },
            DropTarget::Task(_) if effective != gesture.origin => DragEffect::Move {
                id: gesture.task,
                status: effective,
            },
            _ => DragEffect::Cancelled,
        }
    }

    /// Discard any active gesture without producing an effect.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

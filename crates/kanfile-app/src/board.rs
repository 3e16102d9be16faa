//! Board service owning the committed task collection.

use std::collections::BTreeSet;

use kanfile_core::import::{self, ImportError};
use kanfile_core::{Status, Task, TaskDraft, TaskId};
use kanfile_store_json::{BoardStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::drag::DragEffect;
use crate::task_patch::{TaskEditData, TaskPatch};

/// Errors surfaced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Persisting or loading the collection failed.
    #[error("board storage failed: {0}")]
    Store(#[from] StoreError),
    /// An import payload was rejected.
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Counts reported by a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records merged into the collection.
    pub imported: usize,
    /// Records skipped because their id already existed.
    pub skipped: usize,
}

/// Exclusive owner of the committed task collection.
///
/// Every mutating call persists the full collection before returning, and
/// persist failures surface as errors; the one exception is
/// [`StoreError::Unavailable`], which marks an execution context without a
/// persistent medium and downgrades the persist to a no-op. Consumers only
/// ever see read-only views.
pub struct Board<S> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: BoardStore> Board<S> {
    /// Open a board, rehydrating the persisted collection.
    ///
    /// # Errors
    /// Returns an error if the store fails outside its tolerant-load path.
    pub fn open(store: S) -> Result<Self, BoardError> {
        let tasks = store.load()?;
        Ok(Self { store, tasks })
    }

    /// Read-only view of the committed collection, in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Create a task from a draft, assigning a fresh id and the creation
    /// time, and append it to its column.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, BoardError> {
        let task = Task::from_draft(draft, OffsetDateTime::now_utc());
        self.tasks.push(task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Replace a task by id, preserving its original creation time.
    /// Returns false without persisting when the id names no task.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn update(&mut self, task: Task) -> Result<bool, BoardError> {
        let Some(slot) = self.tasks.iter_mut().find(|existing| existing.id == task.id) else {
            return Ok(false);
        };
        let created_at = slot.created_at;
        *slot = task;
        slot.created_at = created_at;
        self.persist()?;
        Ok(true)
    }

    /// Apply an edit diff to a task. Returns false when the id names no
    /// task; an empty diff skips the persist.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn edit(&mut self, id: &TaskId, data: TaskEditData) -> Result<bool, BoardError> {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            return Ok(false);
        };
        let patch = TaskPatch::from_task(task, data);
        if patch.is_empty() {
            return Ok(true);
        }
        patch.apply_to(task);
        self.persist()?;
        Ok(true)
    }

    /// Delete a task by id. Returns false when the id names no task.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn delete(&mut self, id: &TaskId) -> Result<bool, BoardError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Reassign every task named in `ids` to `status`, preserving array
    /// order. Returns the number of tasks touched.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn bulk_move(&mut self, ids: &[TaskId], status: Status) -> Result<usize, BoardError> {
        let mut moved = 0;
        for task in &mut self.tasks {
            if ids.contains(&task.id) {
                task.status = status;
                moved += 1;
            }
        }
        if moved > 0 {
            self.persist()?;
        }
        Ok(moved)
    }

    /// Delete every task named in `ids`. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn bulk_delete(&mut self, ids: &[TaskId]) -> Result<usize, BoardError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !ids.contains(&task.id));
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Merge a JSON export payload into the collection. Records whose id is
    /// already present are skipped, never overwritten.
    ///
    /// # Errors
    /// Returns the codec's error for rejected payloads, or a store error if
    /// persisting fails.
    pub fn import(&mut self, payload: &str) -> Result<ImportSummary, BoardError> {
        let existing: BTreeSet<TaskId> = self.tasks.iter().map(|task| task.id.clone()).collect();
        let outcome = import::from_json(payload, &existing, OffsetDateTime::now_utc())?;
        let summary = ImportSummary {
            imported: outcome.tasks.len(),
            skipped: outcome.skipped,
        };
        if !outcome.tasks.is_empty() {
            self.tasks.extend(outcome.tasks);
            self.persist()?;
        }
        Ok(summary)
    }

    /// Commit a completed drag gesture.
    ///
    /// # Errors
    /// Returns an error if persisting the collection fails.
    pub fn apply_drop(&mut self, effect: DragEffect) -> Result<(), BoardError> {
        match effect {
            DragEffect::Cancelled => Ok(()),
            DragEffect::Move { id, status } => {
                let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
                    return Ok(());
                };
                if task.status == status {
                    return Ok(());
                }
                task.status = status;
                self.persist()
            }
            DragEffect::Reorder { from, to, status } => {
                if from >= self.tasks.len() || to >= self.tasks.len() {
                    return Ok(());
                }
                let mut task = self.tasks.remove(from);
                if let Some(status) = status {
                    task.status = status;
                }
                self.tasks.insert(to.min(self.tasks.len()), task);
                self.persist()
            }
        }
    }

    fn persist(&self) -> Result<(), BoardError> {
        match self.store.save(&self.tasks) {
            Ok(()) => Ok(()),
            Err(StoreError::Unavailable) => {
                tracing::debug!("skipping persist: no storage medium available");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

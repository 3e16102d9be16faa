//! Storage port for kanfile boards.
//!
//! A board persists as one JSON document holding the whole task collection.
//! Writes are last-writer-wins with no transaction semantics; reads are
//! tolerant, so a board always opens even when the persisted data is absent
//! or damaged.

/// Error types.
pub mod error;

pub use error::StoreError;

use kanfile_core::Task;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Port through which the board loads and persists its collection.
pub trait BoardStore {
    /// Load the persisted collection.
    ///
    /// Absent or malformed data loads as an empty list rather than an error,
    /// so a damaged document never prevents the board from opening.
    ///
    /// # Errors
    /// Returns an error only for failures outside the persisted data itself
    /// (e.g. a poisoned lock).
    fn load(&self) -> Result<Vec<Task>, StoreError>;

    /// Persist the full collection, replacing the previous snapshot.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store has no persistent
    /// medium, and I/O or serialization errors otherwise.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Store backed by a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. The file and its parent
    /// directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read board data, starting empty");
                return Ok(Vec::new());
            }
        };
        match serde_json::from_str(&raw) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "discarding malformed board data");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(tasks).map_err(StoreError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write via a sibling temp file so an interrupted write leaves the
        // previous snapshot intact.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// In-memory store used by tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
    available: bool,
}

impl MemoryStore {
    /// Empty store that accepts saves.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            available: true,
        }
    }

    /// Store seeded with an initial collection.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            available: true,
        }
    }

    /// Store that refuses writes, modeling an execution context without a
    /// persistent medium.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            available: false,
        }
    }

    /// Snapshot of what has been saved so far.
    ///
    /// # Errors
    /// Returns an error if the internal lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.lock().map_err(|_| StoreError::Lock)?.clone())
    }
}

impl BoardStore for MemoryStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.available {
            return Ok(Vec::new());
        }
        self.snapshot()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        let mut slot = self.tasks.lock().map_err(|_| StoreError::Lock)?;
        *slot = tasks.to_vec();
        Ok(())
    }
}

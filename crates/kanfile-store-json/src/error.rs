//! Error types for board store operations.

use thiserror::Error;

/// Errors that can occur during board store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No persistent medium is available in this execution context.
    #[error("no persistent storage medium is available")]
    Unavailable,

    /// Failed to serialize the task collection.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The store's internal lock was poisoned.
    #[error("store lock poisoned")]
    Lock,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

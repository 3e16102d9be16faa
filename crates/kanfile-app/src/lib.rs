//! Application layer logic for kanfile.
//!
//! This crate provides the board service, drag gesture coordination, edit
//! patches, and filter utilities shared by frontends.

pub mod board;
pub mod drag;
pub mod filter_util;
pub mod task_patch;

// Re-exports for convenience
pub use board::{Board, BoardError, ImportSummary};
pub use drag::{DragCoordinator, DragEffect, DropTarget};
pub use filter_util::{FilterBuildError, FilterBuildResult, TaskFilterBuilder};
pub use task_patch::{
    diff_sets, DescriptionPatch, DueDateEdit, DueDatePatch, SetDiff, TaskEditData, TaskPatch,
};

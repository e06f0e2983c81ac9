//! Driving port for task mutations.

use async_trait::async_trait;

use crate::domain::{Error, TaskChanges, TaskDraft, TaskId, TaskView};

/// Domain use-case port for creating, updating and deleting tasks.
///
/// Returned tasks are re-read after the write and carry a fresh badge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Create a task.
    ///
    /// # Errors
    /// A validation error on `assigneeId` when the assignee does not exist.
    async fn create(&self, draft: TaskDraft) -> Result<TaskView, Error>;

    /// Apply a partial update and refresh `updatedAt`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] for an unknown task, or a
    /// validation error on `assigneeId` when the new assignee does not exist.
    async fn update(&self, id: &TaskId, changes: TaskChanges) -> Result<TaskView, Error>;

    /// Delete a task together with its comments.
    async fn delete(&self, id: &TaskId) -> Result<(), Error>;
}

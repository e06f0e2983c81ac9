//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::{Comment, Error, TaskId};

/// Domain use-case port for reading a task's discussion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// Comments on a task, oldest first.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the task does not exist.
    async fn list_for_task(&self, task_id: &TaskId) -> Result<Vec<Comment>, Error>;
}

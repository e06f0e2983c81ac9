//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, CommentBody, CommentId, NewComment, TaskId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Driven port over the `comments` table. Reads resolve the author.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &NewComment) -> Result<(), CommentPersistenceError>;

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError>;

    /// Comments on a task, oldest first.
    async fn list_for_task(&self, task_id: &TaskId)
    -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Replace a comment body. Returns `false` when the comment does not
    /// exist.
    async fn update_body(
        &self,
        id: &CommentId,
        body: &CommentBody,
    ) -> Result<bool, CommentPersistenceError>;

    /// Returns `false` when the comment does not exist.
    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError>;
}

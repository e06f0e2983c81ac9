//! Driving port for comment mutations.
//!
//! Every operation takes the acting user so the service can enforce that
//! only a comment's author edits or deletes it.

use async_trait::async_trait;

use crate::domain::{Comment, CommentBody, CommentId, Error, TaskId, UserId};

/// Domain use-case port for posting, editing and deleting comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Post a comment on a task.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the task does not exist.
    async fn post(
        &self,
        task_id: &TaskId,
        author_id: &UserId,
        body: CommentBody,
    ) -> Result<Comment, Error>;

    /// Replace the body of the actor's own comment.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Forbidden`] when `actor` is not the author.
    async fn edit(
        &self,
        id: &CommentId,
        actor: &UserId,
        body: CommentBody,
    ) -> Result<Comment, Error>;

    /// Delete the actor's own comment.
    async fn delete(&self, id: &CommentId, actor: &UserId) -> Result<(), Error>;
}

//! Port abstraction for task persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewTask, Task, TaskChanges, TaskFilter, TaskId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by task repository adapters.
    pub enum TaskPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Driven port over the `tasks` table.
///
/// Reads resolve the assignee by joining `users`. Writes never return the
/// stored row; callers re-select it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &NewTask) -> Result<(), TaskPersistenceError>;

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskPersistenceError>;

    /// Tasks matching `filter`, newest first.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskPersistenceError>;

    /// Apply `changes` and stamp `updated_at`. Returns `false` when the task
    /// does not exist.
    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TaskPersistenceError>;

    /// Delete a task and its comments. Returns `false` when the task does not
    /// exist.
    async fn delete(&self, id: &TaskId) -> Result<bool, TaskPersistenceError>;
}

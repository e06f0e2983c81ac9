//! Driving port for task reads.

use async_trait::async_trait;

use crate::domain::{Error, TaskFilter, TaskId, TaskView};

/// Domain use-case port for listing and fetching tasks with their badges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQuery: Send + Sync {
    /// Tasks matching `filter`, newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskView>, Error>;

    /// A single task.
    async fn get_task(&self, id: &TaskId) -> Result<TaskView, Error>;
}

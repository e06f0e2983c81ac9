//! Task use cases.
//!
//! Writes are sequential statements without a wrapping transaction: the
//! assignee check, the write and the re-select each run on their own. Every
//! task returned is decorated with a badge computed from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{
    TaskCommand, TaskPersistenceError, TaskQuery, TaskRepository, UserRepository,
};
use crate::domain::{
    Error, FieldError, NewTask, Task, TaskChanges, TaskDraft, TaskFilter, TaskId, TaskView, UserId,
};

/// Task service implementing [`TaskCommand`] and [`TaskQuery`].
#[derive(Clone)]
pub struct TaskService<T, U> {
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TaskService<T, U> {
    /// Create a new service.
    pub fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }
}

pub(crate) fn map_task_error(error: TaskPersistenceError) -> Error {
    match error {
        TaskPersistenceError::Connection { message } => {
            Error::internal(format!("task repository unavailable: {message}"))
        }
        TaskPersistenceError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

fn unknown_assignee() -> Error {
    Error::validation(vec![FieldError::new(
        "assigneeId",
        "unknown_user",
        "assignee does not exist",
    )])
}

impl<T, U> TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn ensure_assignee_exists(&self, assignee: Option<UserId>) -> Result<(), Error> {
        let Some(assignee) = assignee else {
            return Ok(());
        };
        match self
            .users
            .find_by_id(&assignee)
            .await
            .map_err(map_user_error)?
        {
            Some(_) => Ok(()),
            None => Err(unknown_assignee()),
        }
    }

    async fn load(&self, id: &TaskId) -> Result<Option<Task>, Error> {
        self.tasks.find_by_id(id).await.map_err(map_task_error)
    }

    /// Re-read a task just written. A missing row means it was deleted
    /// between the write and the read.
    async fn reload(&self, id: &TaskId) -> Result<TaskView, Error> {
        self.load(id)
            .await?
            .map(|task| task.into_view(self.clock.utc()))
            .ok_or_else(|| Error::not_found("task not found"))
    }
}

#[async_trait]
impl<T, U> TaskCommand for TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn create(&self, draft: TaskDraft) -> Result<TaskView, Error> {
        self.ensure_assignee_exists(draft.assignee_id).await?;
        let task = NewTask {
            id: TaskId::random(),
            title: draft.title.as_ref().to_owned(),
            description: draft.description,
            priority: draft.priority.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            assignee_id: draft.assignee_id,
            due_date: draft.due_date,
            created_at: self.clock.utc(),
        };
        self.tasks.insert(&task).await.map_err(map_task_error)?;
        info!(task_id = %task.id, "created task");
        self.reload(&task.id).await
    }

    async fn update(&self, id: &TaskId, changes: TaskChanges) -> Result<TaskView, Error> {
        self.ensure_assignee_exists(changes.new_assignee()).await?;
        let updated = self
            .tasks
            .update(id, &changes, self.clock.utc())
            .await
            .map_err(map_task_error)?;
        if !updated {
            return Err(Error::not_found("task not found"));
        }
        info!(task_id = %id, "updated task");
        self.reload(id).await
    }

    async fn delete(&self, id: &TaskId) -> Result<(), Error> {
        let deleted = self.tasks.delete(id).await.map_err(map_task_error)?;
        if !deleted {
            return Err(Error::not_found("task not found"));
        }
        info!(task_id = %id, "deleted task");
        Ok(())
    }
}

#[async_trait]
impl<T, U> TaskQuery for TaskService<T, U>
where
    T: TaskRepository,
    U: UserRepository,
{
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskView>, Error> {
        let tasks = self.tasks.list(filter).await.map_err(map_task_error)?;
        let now = self.clock.utc();
        Ok(tasks.into_iter().map(|task| task.into_view(now)).collect())
    }

    async fn get_task(&self, id: &TaskId) -> Result<TaskView, Error> {
        self.reload(id).await
    }
}

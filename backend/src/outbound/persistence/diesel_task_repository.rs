//! PostgreSQL-backed `TaskRepository`.
//!
//! Reads left-join `users` so the assignee comes back with the task. Enum
//! columns are stored as snake_case strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TaskPersistenceError, TaskRepository};
use crate::domain::{
    NewTask, Task, TaskChanges, TaskFilter, TaskId, TaskPriority, TaskStatus, UserId, UserSummary,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTaskRow, TaskChangeset, TaskRow, UserSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{tasks, users};

/// Diesel-backed implementation of [`TaskRepository`].
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskPersistenceError {
    map_basic_pool_error(error, TaskPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TaskPersistenceError {
    map_basic_diesel_error(
        error,
        TaskPersistenceError::query,
        TaskPersistenceError::connection,
    )
}

pub(super) fn summary_from_row(row: UserSummaryRow) -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(row.id),
        display_name: row.display_name,
        email: row.email,
    }
}

fn row_to_task(
    (row, assignee): (TaskRow, Option<UserSummaryRow>),
) -> Result<Task, TaskPersistenceError> {
    let priority = row
        .priority
        .parse::<TaskPriority>()
        .map_err(|err| TaskPersistenceError::query(format!("stored task corrupt: {err}")))?;
    let status = row
        .status
        .parse::<TaskStatus>()
        .map_err(|err| TaskPersistenceError::query(format!("stored task corrupt: {err}")))?;
    Ok(Task {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        priority,
        status,
        assignee: assignee.map(summary_from_row),
        due_date: row.due_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn changeset(changes: &TaskChanges, updated_at: DateTime<Utc>) -> TaskChangeset<'_> {
    TaskChangeset {
        title: changes.title.as_ref().map(AsRef::as_ref),
        description: changes
            .description
            .as_ref()
            .map(|description| description.as_deref()),
        priority: changes.priority.map(TaskPriority::as_str),
        status: changes.status.map(TaskStatus::as_str),
        assignee_id: changes.assignee_id.map(|assignee| assignee.map(Uuid::from)),
        due_date: changes.due_date,
        updated_at,
    }
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<(), TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTaskRow {
            id: *task.id.as_uuid(),
            title: &task.title,
            description: task.description.as_deref(),
            priority: task.priority.as_str(),
            status: task.status.as_str(),
            assignee_id: task.assignee_id.map(Uuid::from),
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.created_at,
        };
        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(TaskRow, Option<UserSummaryRow>)> = tasks::table
            .left_join(users::table)
            .filter(tasks::id.eq(id.as_uuid()))
            .select((TaskRow::as_select(), Option::<UserSummaryRow>::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_task).transpose()
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = tasks::table
            .left_join(users::table)
            .select((TaskRow::as_select(), Option::<UserSummaryRow>::as_select()))
            .order((tasks::created_at.desc(), tasks::id.desc()))
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(tasks::status.eq(status.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(tasks::priority.eq(priority.as_str()));
        }
        if let Some(assignee) = filter.assignee_id {
            query = query.filter(tasks::assignee_id.eq(Uuid::from(assignee)));
        }
        let rows: Vec<(TaskRow, Option<UserSummaryRow>)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_task).collect()
    }

    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(tasks::table.find(id.as_uuid()))
            .set(&changeset(changes, updated_at))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tasks::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

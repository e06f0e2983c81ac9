//! PostgreSQL-backed `CommentRepository`. Reads inner-join the author.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, CommentBody, CommentId, NewComment, TaskId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_task_repository::summary_from_row;
use super::models::{CommentRow, NewCommentRow, UserSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of [`CommentRepository`].
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_basic_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

fn row_to_comment((row, author): (CommentRow, UserSummaryRow)) -> Comment {
    Comment {
        id: CommentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        body: row.body,
        author: summary_from_row(author),
        created_at: row.created_at,
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            id: *comment.id.as_uuid(),
            task_id: *comment.task_id.as_uuid(),
            author_id: *comment.author_id.as_uuid(),
            body: comment.body.as_ref(),
            created_at: comment.created_at,
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(CommentRow, UserSummaryRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id.as_uuid()))
            .select((CommentRow::as_select(), UserSummaryRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_comment))
    }

    async fn list_for_task(
        &self,
        task_id: &TaskId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, UserSummaryRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::task_id.eq(task_id.as_uuid()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), UserSummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_comment).collect())
    }

    async fn update_body(
        &self,
        id: &CommentId,
        body: &CommentBody,
    ) -> Result<bool, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(comments::table.find(id.as_uuid()))
            .set(comments::body.eq(body.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(comments::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

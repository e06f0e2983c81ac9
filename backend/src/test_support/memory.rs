//! In-memory repositories mirroring the Postgres adapters.
//!
//! One [`InMemoryStore`] backs all three repository ports so that the
//! cascade rules hold across tables: deleting a user unassigns their tasks
//! and removes their comments, deleting a task removes its comments.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, TaskPersistenceError, TaskRepository,
    UserCredentialRecord, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentBody, CommentId, Email, NewComment, NewTask, Task, TaskChanges, TaskFilter,
    TaskId, User, UserId, UserSummary,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct StoredTask {
    row: NewTask,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredComment {
    id: CommentId,
    task_id: TaskId,
    author_id: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredUser>,
    tasks: Vec<StoredTask>,
    comments: Vec<StoredComment>,
}

impl Tables {
    fn summary(&self, id: UserId) -> Option<UserSummary> {
        self.users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| UserSummary::from(&stored.user))
    }

    fn task(&self, stored: &StoredTask) -> Task {
        let row = &stored.row;
        Task {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            priority: row.priority,
            status: row.status,
            assignee: row.assignee_id.and_then(|id| self.summary(id)),
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn comment(&self, stored: &StoredComment) -> Option<Comment> {
        let author = self.summary(stored.author_id)?;
        Some(Comment {
            id: stored.id,
            task_id: stored.task_id,
            body: stored.body.clone(),
            author,
            created_at: stored.created_at,
        })
    }
}

/// Thread-safe store implementing the user, task and comment repositories.
///
/// Orderings match the SQL adapters: users by display name, tasks newest
/// first, comments oldest first.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments, across all tasks.
    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|stored| stored.user.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email(
                user.email.as_ref().to_owned(),
            ));
        }
        tables.users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialRecord>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| &stored.user.email == email)
            .map(|stored| UserCredentialRecord {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = self
            .lock()
            .users
            .iter()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|a, b| {
            a.display_name
                .as_ref()
                .cmp(b.display_name.as_ref())
                .then(a.id.cmp(&b.id))
        });
        Ok(users)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock();
        let before = tables.users.len();
        tables.users.retain(|stored| stored.user.id != *id);
        if tables.users.len() == before {
            return Ok(false);
        }
        for task in &mut tables.tasks {
            if task.row.assignee_id == Some(*id) {
                task.row.assignee_id = None;
            }
        }
        tables.comments.retain(|comment| comment.author_id != *id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn insert(&self, task: &NewTask) -> Result<(), TaskPersistenceError> {
        self.lock().tasks.push(StoredTask {
            row: task.clone(),
            updated_at: task.created_at,
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, TaskPersistenceError> {
        let tables = self.lock();
        Ok(tables
            .tasks
            .iter()
            .find(|stored| stored.row.id == *id)
            .map(|stored| tables.task(stored)))
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskPersistenceError> {
        let tables = self.lock();
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .map(|stored| tables.task(stored))
            .filter(|task| filter.matches(task))
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn update(
        &self,
        id: &TaskId,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TaskPersistenceError> {
        let mut tables = self.lock();
        let Some(stored) = tables.tasks.iter_mut().find(|stored| stored.row.id == *id) else {
            return Ok(false);
        };
        let row = &mut stored.row;
        if let Some(title) = &changes.title {
            row.title = title.as_ref().to_owned();
        }
        if let Some(description) = &changes.description {
            row.description.clone_from(description);
        }
        if let Some(priority) = changes.priority {
            row.priority = priority;
        }
        if let Some(status) = changes.status {
            row.status = status;
        }
        if let Some(assignee_id) = changes.assignee_id {
            row.assignee_id = assignee_id;
        }
        if let Some(due_date) = changes.due_date {
            row.due_date = due_date;
        }
        stored.updated_at = updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, TaskPersistenceError> {
        let mut tables = self.lock();
        let before = tables.tasks.len();
        tables.tasks.retain(|stored| stored.row.id != *id);
        if tables.tasks.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|comment| comment.task_id != *id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &NewComment) -> Result<(), CommentPersistenceError> {
        let mut tables = self.lock();
        if !tables.tasks.iter().any(|stored| stored.row.id == comment.task_id) {
            return Err(CommentPersistenceError::query(
                "foreign key violation: comments.task_id",
            ));
        }
        if tables.summary(comment.author_id).is_none() {
            return Err(CommentPersistenceError::query(
                "foreign key violation: comments.author_id",
            ));
        }
        tables.comments.push(StoredComment {
            id: comment.id,
            task_id: comment.task_id,
            author_id: comment.author_id,
            body: comment.body.as_ref().to_owned(),
            created_at: comment.created_at,
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let tables = self.lock();
        Ok(tables
            .comments
            .iter()
            .find(|stored| stored.id == *id)
            .and_then(|stored| tables.comment(stored)))
    }

    async fn list_for_task(
        &self,
        task_id: &TaskId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let tables = self.lock();
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|stored| stored.task_id == *task_id)
            .filter_map(|stored| tables.comment(stored))
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn update_body(
        &self,
        id: &CommentId,
        body: &CommentBody,
    ) -> Result<bool, CommentPersistenceError> {
        let mut tables = self.lock();
        let Some(stored) = tables.comments.iter_mut().find(|stored| stored.id == *id) else {
            return Ok(false);
        };
        stored.body = body.as_ref().to_owned();
        Ok(true)
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError> {
        let mut tables = self.lock();
        let before = tables.comments.len();
        tables.comments.retain(|stored| stored.id != *id);
        Ok(tables.comments.len() != before)
    }
}

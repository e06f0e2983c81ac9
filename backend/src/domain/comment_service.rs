//! Comment use cases. Only a comment's author may edit or delete it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::account_service::map_user_error;
use crate::domain::ports::{
    CommentCommand, CommentPersistenceError, CommentQuery, CommentRepository, TaskRepository,
    UserRepository,
};
use crate::domain::task_service::map_task_error;
use crate::domain::{
    Comment, CommentBody, CommentId, Error, NewComment, TaskId, UserId,
};

/// Comment service implementing [`CommentCommand`] and [`CommentQuery`].
#[derive(Clone)]
pub struct CommentService<C, T, U> {
    comments: Arc<C>,
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, T, U> CommentService<C, T, U> {
    /// Create a new service.
    pub fn new(comments: Arc<C>, tasks: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            tasks,
            users,
            clock,
        }
    }
}

fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => {
            Error::internal(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

fn comment_not_found() -> Error {
    Error::not_found("comment not found")
}

impl<C, T, U> CommentService<C, T, U>
where
    C: CommentRepository,
    T: TaskRepository,
    U: UserRepository,
{
    /// Tokens outlive account deletion, so a verified caller may be gone.
    async fn ensure_author_exists(&self, author_id: &UserId) -> Result<(), Error> {
        match self
            .users
            .find_by_id(author_id)
            .await
            .map_err(map_user_error)?
        {
            Some(_) => Ok(()),
            None => Err(Error::forbidden("account no longer exists")),
        }
    }

    async fn ensure_task_exists(&self, task_id: &TaskId) -> Result<(), Error> {
        match self.tasks.find_by_id(task_id).await.map_err(map_task_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("task not found")),
        }
    }

    async fn reload(&self, id: &CommentId) -> Result<Comment, Error> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(comment_not_found)
    }

    /// Load a comment and check that `actor` wrote it.
    async fn owned_by(&self, id: &CommentId, actor: &UserId) -> Result<Comment, Error> {
        let comment = self.reload(id).await?;
        if !comment.is_authored_by(*actor) {
            return Err(Error::forbidden("only the author may change this comment"));
        }
        Ok(comment)
    }
}

#[async_trait]
impl<C, T, U> CommentCommand for CommentService<C, T, U>
where
    C: CommentRepository,
    T: TaskRepository,
    U: UserRepository,
{
    async fn post(
        &self,
        task_id: &TaskId,
        author_id: &UserId,
        body: CommentBody,
    ) -> Result<Comment, Error> {
        self.ensure_author_exists(author_id).await?;
        self.ensure_task_exists(task_id).await?;
        let comment = NewComment {
            id: CommentId::random(),
            task_id: *task_id,
            author_id: *author_id,
            body,
            created_at: self.clock.utc(),
        };
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, %task_id, "posted comment");
        self.reload(&comment.id).await
    }

    async fn edit(
        &self,
        id: &CommentId,
        actor: &UserId,
        body: CommentBody,
    ) -> Result<Comment, Error> {
        self.owned_by(id, actor).await?;
        let updated = self
            .comments
            .update_body(id, &body)
            .await
            .map_err(map_comment_error)?;
        if !updated {
            return Err(comment_not_found());
        }
        info!(comment_id = %id, "edited comment");
        self.reload(id).await
    }

    async fn delete(&self, id: &CommentId, actor: &UserId) -> Result<(), Error> {
        self.owned_by(id, actor).await?;
        let deleted = self
            .comments
            .delete(id)
            .await
            .map_err(map_comment_error)?;
        if !deleted {
            return Err(comment_not_found());
        }
        info!(comment_id = %id, "deleted comment");
        Ok(())
    }
}

#[async_trait]
impl<C, T, U> CommentQuery for CommentService<C, T, U>
where
    C: CommentRepository,
    T: TaskRepository,
    U: UserRepository,
{
    async fn list_for_task(&self, task_id: &TaskId) -> Result<Vec<Comment>, Error> {
        self.ensure_task_exists(task_id).await?;
        self.comments
            .list_for_task(task_id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCommentRepository, MockTaskRepository, MockUserRepository};
    use crate::domain::{
        DisplayName, Email, ErrorCode, Task, TaskPriority, TaskStatus, User, UserSummary,
    };
    use crate::test_support::MutableClock;
    use chrono::Utc;
    use rstest::rstest;

    fn existing_task(id: TaskId) -> Task {
        Task {
            id,
            title: "Plan sprint".to_owned(),
            description: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::Backlog,
            assignee: None,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn comment_by(author: UserId) -> Comment {
        Comment {
            id: CommentId::random(),
            task_id: TaskId::random(),
            body: "first".to_owned(),
            author: UserSummary {
                id: author,
                display_name: "Author".to_owned(),
                email: "author@example.com".to_owned(),
            },
            created_at: Utc::now(),
        }
    }

    fn known_users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id: *id,
                email: Email::new("author@example.com").expect("email"),
                display_name: DisplayName::new("Author").expect("name"),
                created_at: Utc::now(),
            }))
        });
        users
    }

    type Service = CommentService<MockCommentRepository, MockTaskRepository, MockUserRepository>;

    fn service_with_users(
        comments: MockCommentRepository,
        tasks: MockTaskRepository,
        users: MockUserRepository,
    ) -> Service {
        CommentService::new(
            Arc::new(comments),
            Arc::new(tasks),
            Arc::new(users),
            Arc::new(MutableClock::new(Utc::now())),
        )
    }

    fn service(comments: MockCommentRepository, tasks: MockTaskRepository) -> Service {
        service_with_users(comments, tasks, known_users())
    }

    fn body(text: &str) -> CommentBody {
        CommentBody::new(text).expect("valid body")
    }

    #[rstest]
    #[tokio::test]
    async fn posting_on_missing_task_is_not_found() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().returning(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();
        let service = service(comments, tasks);

        let err = service
            .post(&TaskId::random(), &UserId::random(), body("hello"))
            .await
            .expect_err("missing task");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "task not found");
    }

    #[rstest]
    #[tokio::test]
    async fn posting_as_a_deleted_account_is_forbidden() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().never();
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();
        let service = service_with_users(comments, tasks, users);

        let err = service
            .post(&TaskId::random(), &UserId::random(), body("still here?"))
            .await
            .expect_err("account removed");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "account no longer exists");
    }

    #[rstest]
    #[tokio::test]
    async fn posting_returns_stored_comment() {
        let author = UserId::random();
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_find_by_id()
            .returning(|id| Ok(Some(existing_task(*id))));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .withf(move |new| new.author_id == author && new.body.as_ref() == "hello")
            .times(1)
            .returning(|_| Ok(()));
        comments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(comment_by(author))));
        let service = service(comments, tasks);

        let comment = service
            .post(&TaskId::random(), &author, body("hello"))
            .await
            .expect("posted");
        assert!(comment.is_authored_by(author));
    }

    #[rstest]
    #[tokio::test]
    async fn editing_someone_elses_comment_is_forbidden() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|_| Ok(Some(comment_by(UserId::random()))));
        comments.expect_update_body().never();
        let service = service(comments, MockTaskRepository::new());

        let err = service
            .edit(&CommentId::random(), &UserId::random(), body("mine now"))
            .await
            .expect_err("not the author");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_missing_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find_by_id().returning(|_| Ok(None));
        let service = service(comments, MockTaskRepository::new());

        let err = service
            .delete(&CommentId::random(), &UserId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn author_can_delete_own_comment() {
        let author = UserId::random();
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(comment_by(author))));
        comments.expect_delete().times(1).returning(|_| Ok(true));
        let service = service(comments, MockTaskRepository::new());

        service
            .delete(&CommentId::random(), &author)
            .await
            .expect("deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn listing_requires_existing_task() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().returning(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_list_for_task().never();
        let service = service(comments, tasks);

        let err = service
            .list_for_task(&TaskId::random())
            .await
            .expect_err("missing task");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

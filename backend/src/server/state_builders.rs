//! Wiring of repositories, credential adapters and services into
//! [`HttpState`].

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::ports::{CommentRepository, TaskRepository, UserRepository};
use crate::domain::{AccountService, CommentService, TaskService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselTaskRepository, DieselUserRepository,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtSecret, JwtTokenService};

/// The three driven stores the services read and write.
pub struct Repositories<U, T, C> {
    pub users: Arc<U>,
    pub tasks: Arc<T>,
    pub comments: Arc<C>,
}

impl Repositories<DieselUserRepository, DieselTaskRepository, DieselCommentRepository> {
    /// PostgreSQL repositories sharing one pool.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tasks: Arc::new(DieselTaskRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        }
    }
}

/// Token and clock settings shared by the services.
pub struct Security<'a> {
    pub jwt_secret: &'a JwtSecret,
    pub token_ttl: TimeDelta,
    pub clock: Arc<dyn Clock>,
}

/// Build the handler state over any repository implementations.
pub fn build_http_state<U, T, C>(
    repositories: Repositories<U, T, C>,
    security: Security<'_>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    C: CommentRepository + 'static,
{
    let Repositories {
        users,
        tasks,
        comments,
    } = repositories;
    let Security {
        jwt_secret,
        token_ttl,
        clock,
    } = security;

    let tokens = Arc::new(JwtTokenService::new(jwt_secret, token_ttl, Arc::clone(&clock)));
    let accounts = AccountService::new(
        Arc::clone(&users),
        Arc::new(Argon2PasswordHasher),
        tokens,
        Arc::clone(&clock),
    );
    let task_service = TaskService::new(Arc::clone(&tasks), Arc::clone(&users), Arc::clone(&clock));
    let comment_service = CommentService::new(comments, tasks, users, clock);

    HttpState::new(
        Arc::new(accounts),
        Arc::new(task_service),
        Arc::new(comment_service),
    )
}

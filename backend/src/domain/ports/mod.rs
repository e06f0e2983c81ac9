//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, token signer) are implemented by the
//! outbound adapters. Driving ports are implemented by the domain services
//! and called by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod comment_command;
mod comment_query;
mod comment_repository;
mod password_hasher;
mod task_command;
mod task_query;
mod task_repository;
mod token_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockTokenAuthenticator};
pub use account_command::{AccountCommand, TokenAuthenticator};
#[cfg(test)]
pub use comment_command::MockCommentCommand;
pub use comment_command::CommentCommand;
#[cfg(test)]
pub use comment_query::MockCommentQuery;
pub use comment_query::CommentQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::TaskCommand;
#[cfg(test)]
pub use task_query::MockTaskQuery;
pub use task_query::TaskQuery;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskPersistenceError, TaskRepository};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentialRecord, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

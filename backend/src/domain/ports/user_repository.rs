//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already owns the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// A user together with the stored password hash, used for login only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialRecord {
    pub user: User,
    pub password_hash: String,
}

/// Driven port over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Fetch an account and its password hash by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// All users ordered by display name.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Delete a user. Their tasks become unassigned and their comments are
    /// removed. Returns `false` when no such user exists.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}

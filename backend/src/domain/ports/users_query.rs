//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All users ordered by display name.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// A single user.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::NotFound`] for an unknown id.
    async fn find_user(&self, user_id: &UserId) -> Result<User, Error>;
}

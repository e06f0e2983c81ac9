//! Driving port for account lifecycle use-cases.
//!
//! Inbound adapters call this port to register, log in and close accounts
//! without touching the password hasher, token signer or user store
//! directly.

use async_trait::async_trait;

use crate::domain::{AccessClaims, AuthSession, Error, LoginCredentials, Registration, UserId};

/// Domain use-case port for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and issue its first token.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::InvalidRequest`] when the email is
    /// already registered.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] for an unknown
    /// email or a wrong password, without saying which.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Delete the caller's own account.
    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error>;
}

/// Driving port used by the bearer-token extractor.
#[cfg_attr(test, mockall::automock)]
pub trait TokenAuthenticator: Send + Sync {
    /// Verify a presented token.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::Forbidden`] when the token is
    /// malformed, badly signed or expired.
    fn authenticate(&self, token: &str) -> Result<AccessClaims, Error>;
}

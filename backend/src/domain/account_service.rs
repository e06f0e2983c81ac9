//! Account use cases: registration, login, account deletion and user reads.
//!
//! The service hashes passwords through [`PasswordHasher`], persists accounts
//! through [`UserRepository`] and issues tokens through [`TokenService`].
//! Passwords and tokens never reach the logs.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, PasswordHasher, TokenAuthenticator, TokenError, TokenService,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    AccessClaims, AuthSession, Error, FieldError, LoginCredentials, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Account service implementing [`AccountCommand`], [`UsersQuery`] and
/// [`TokenAuthenticator`].
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::validation(vec![FieldError::new(
            "email",
            "duplicate",
            "email is already registered",
        )]),
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("failed to issue token: {message}"))
        }
        TokenError::Invalid { .. } => Error::forbidden("invalid token"),
        TokenError::Expired => Error::forbidden("token expired"),
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    fn start_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user).map_err(map_token_error)?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<U, H, T> AccountCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User {
            id: UserId::random(),
            email: registration.email().clone(),
            display_name: registration.display_name().clone(),
            created_at: self.clock.utc(),
        };
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "registered account");
        self.start_session(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Some(record) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(credentials.password(), &record.password_hash)
        {
            debug!(user_id = %record.user.id, "login with wrong password rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.start_session(record.user)
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error> {
        let deleted = self.users.delete(user_id).await.map_err(map_user_error)?;
        if !deleted {
            return Err(Error::not_found("user not found"));
        }
        info!(%user_id, "deleted account");
        Ok(())
    }
}

#[async_trait]
impl<U, H, T> UsersQuery for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }

    async fn find_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

impl<U, H, T> TokenAuthenticator for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    fn authenticate(&self, token: &str) -> Result<AccessClaims, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }
}

//! Shared bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! Repositories check a connection out per statement; a checkout that waits
//! longer than [`CHECKOUT_TIMEOUT`] surfaces as [`PoolError::Checkout`] and
//! is mapped to the repository's own connection error.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

/// How long a handler waits for a free connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

define_port_error! {
    /// Errors raised while building the pool or checking out a connection.
    pub enum PoolError {
        Checkout { message: String } => "failed to get connection from pool: {message}",
        Build { message: String } => "failed to build connection pool: {message}",
    }
}

/// Where to connect and how many connections to keep.
///
/// # Examples
/// ```
/// use taskboard::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/taskboard").with_max_size(0);
/// assert_eq!(config.max_size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
}

impl PoolConfig {
    /// Ten connections unless overridden.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
        }
    }

    /// Cap the pool. A zero cap is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Handle shared by all repositories. Clones share the same connections.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open one idle connection, so a bad URL or an
    /// unreachable server fails at startup rather than on the first request.
    ///
    /// # Errors
    /// [`PoolError::Build`] when the first connection cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(1))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// [`PoolError::Checkout`] when none frees up within [`CHECKOUT_TIMEOUT`].
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

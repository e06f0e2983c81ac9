//! HTTP server configuration object.

use std::net::SocketAddr;

use chrono::TimeDelta;

use crate::outbound::persistence::DbPool;
use crate::outbound::security::JwtSecret;

/// Everything [`super::create_server`] needs besides the health flag.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) jwt_secret: JwtSecret,
    pub(crate) token_ttl: TimeDelta,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, jwt_secret: JwtSecret) -> Self {
        Self {
            bind_addr,
            db_pool,
            jwt_secret,
            token_ttl: TimeDelta::hours(24),
        }
    }

    /// Override the access token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: TimeDelta) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

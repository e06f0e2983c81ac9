//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TASKBOARD_*` environment variables or the matching
//! command-line flags (`--database-url`, `--bind-addr`, ...).

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::security::{JwtSecret, JwtSecretError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings that cannot be turned into a running server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("TASKBOARD_DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("TASKBOARD_JWT_SECRET is not set")]
    MissingJwtSecret,
    #[error("invalid TASKBOARD_JWT_SECRET: {0}")]
    WeakJwtSecret(#[from] JwtSecretError),
    #[error("invalid bind address '{value}'")]
    InvalidBindAddr { value: String },
    #[error("token lifetime must be at least one hour")]
    InvalidTokenTtl,
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKBOARD")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// HS256 signing secret, at least 32 bytes.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in hours.
    pub token_ttl_hours: Option<u32>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Start without applying embedded migrations.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        match self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS) {
            0 => Err(SettingsError::InvalidTokenTtl),
            hours => Ok(TimeDelta::hours(i64::from(hours))),
        }
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    /// Migrations run unless explicitly skipped.
    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }

    /// Resolve the signing secret.
    ///
    /// When none is configured and `allow_ephemeral` is set (debug builds), a
    /// random secret is generated and `Ok((secret, true))` is returned.
    pub fn jwt_secret(&self, allow_ephemeral: bool) -> Result<(JwtSecret, bool), SettingsError> {
        match self.jwt_secret.as_deref() {
            Some(secret) => Ok((JwtSecret::new(secret.as_bytes().to_vec())?, false)),
            None if allow_ephemeral => Ok((JwtSecret::ephemeral(), true)),
            None => Err(SettingsError::MissingJwtSecret),
        }
    }
}

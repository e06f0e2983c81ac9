//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API.

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use taskboard::config::AppSettings;
use taskboard::inbound::http::health::HealthState;
use taskboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use taskboard::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let database_url = settings.database_url().map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let token_ttl = settings.token_ttl().map_err(io::Error::other)?;
    let (jwt_secret, ephemeral) = settings
        .jwt_secret(cfg!(debug_assertions))
        .map_err(io::Error::other)?;
    if ephemeral {
        warn!("using temporary JWT secret (dev only); tokens will not survive a restart");
    }

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(io::Error::other)?;

    let config = ServerConfig::new(bind_addr, pool, jwt_secret).with_token_ttl(token_ttl);
    info!(%bind_addr, "starting server");
    create_server(web::Data::new(HealthState::new()), config)?.await
}

//! Taskboard backend: a bearer-token authenticated task tracker.
//!
//! Layout follows a hexagonal split. `domain` holds entities, ports and
//! services; `inbound::http` adapts them to actix-web; `outbound` provides
//! the Postgres repositories and credential adapters; `server` wires them
//! together.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

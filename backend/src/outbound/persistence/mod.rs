//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel row structs and domain types and
//! contain no business rules. Row structs (`models.rs`) and the schema
//! (`schema.rs`) stay private to this module. Connections come from a shared
//! `bb8` pool of `diesel-async` connections.

mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_task_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

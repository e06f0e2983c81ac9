//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel.
//! - **security**: Argon2id password hashing and HS256 bearer tokens.
//!
//! Adapters translate between domain types and infrastructure types and
//! hold no business rules.

pub mod persistence;
pub mod security;

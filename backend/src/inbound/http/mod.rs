//! HTTP inbound adapter exposing the REST endpoints.

pub mod accounts;
pub mod auth;
pub mod comments;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the services that implement the driving ports. Nothing in
//! this module depends on actix-web or Diesel.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] / [`FieldError`]: transport-agnostic failures.
//! - [`User`], [`Task`], [`Comment`]: aggregates read back from the store.
//! - [`classify`] / [`Badge`]: deadline health derived at read time.
//! - [`AccountService`], [`TaskService`], [`CommentService`]: use cases.

mod account_service;
mod auth;
mod badge;
mod comment;
mod comment_service;
pub mod error;
mod ids;
pub mod ports;
mod task;
mod task_service;
mod trace_id;
mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessClaims, AccessToken, AuthSession, CredentialValidationError, LoginCredentials,
    PASSWORD_MAX, PASSWORD_MIN, Registration,
};
pub use self::badge::{AT_RISK_HOURS, Badge, classify};
pub use self::comment::{BODY_MAX, Comment, CommentBody, CommentBodyError, NewComment};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, FieldError};
pub use self::ids::{CommentId, InvalidId, TaskId, UserId};
pub use self::task::{
    NewTask, ParseEnumError, TITLE_MAX, Task, TaskChanges, TaskDraft, TaskFilter, TaskPriority,
    TaskStatus, TaskTitle, TaskTitleError, TaskView,
};
pub use self::task_service::TaskService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, Email, User, UserSummary, UserValidationError,
};


//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockCommentCommand, MockCommentQuery, MockTaskCommand, MockTaskQuery,
    MockTokenAuthenticator, MockUsersQuery,
};
use crate::domain::{AccessClaims, DisplayName, Email, Error, User, UserId};
use crate::inbound::http::state::HttpState;

/// Token accepted by [`authenticated_as`].
pub const TOKEN: &str = "test-token";

/// One mock per driving port; tests override the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub authenticator: MockTokenAuthenticator,
    pub users: MockUsersQuery,
    pub tasks: MockTaskCommand,
    pub tasks_query: MockTaskQuery,
    pub comments: MockCommentCommand,
    pub comments_query: MockCommentQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            authenticator: Arc::new(self.authenticator),
            users: Arc::new(self.users),
            tasks: Arc::new(self.tasks),
            tasks_query: Arc::new(self.tasks_query),
            comments: Arc::new(self.comments),
            comments_query: Arc::new(self.comments_query),
        })
    }
}

/// Authenticator accepting [`TOKEN`] for `user_id` and rejecting anything else.
pub fn authenticated_as(user_id: UserId) -> MockTokenAuthenticator {
    let mut authenticator = MockTokenAuthenticator::new();
    authenticator.expect_authenticate().returning(move |token| {
        if token == TOKEN {
            Ok(AccessClaims {
                user_id,
                email: "caller@example.com".to_owned(),
                issued_at: fixed_now(),
                expires_at: fixed_now() + chrono::TimeDelta::hours(24),
            })
        } else {
            Err(Error::forbidden("invalid token"))
        }
    });
    authenticator
}

/// `Authorization` header carrying [`TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TOKEN}"))
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn sample_user(id: UserId, name: &str, email: &str) -> User {
    User {
        id,
        email: Email::new(email).expect("email"),
        display_name: DisplayName::new(name).expect("name"),
        created_at: fixed_now(),
    }
}

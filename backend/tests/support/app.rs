//! In-process application harness over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, web};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};
use taskboard::inbound::http::health::HealthState;
use taskboard::outbound::security::JwtSecret;
use taskboard::server::{AppDependencies, Repositories, Security, build_app, build_http_state};
use taskboard::test_support::{InMemoryStore, MutableClock};

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

pub(crate) fn start_of_test() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Build the full application over one shared store and a settable clock.
pub(crate) async fn spawn(
    clock: Arc<MutableClock>,
) -> (
    impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    Arc<InMemoryStore>,
) {
    let store = Arc::new(InMemoryStore::new());
    let secret = JwtSecret::new(SECRET).expect("secret");
    let clock: Arc<dyn Clock> = clock;
    let http_state = build_http_state(
        Repositories {
            users: Arc::clone(&store),
            tasks: Arc::clone(&store),
            comments: Arc::clone(&store),
        },
        Security {
            jwt_secret: &secret,
            token_ttl: TimeDelta::hours(24),
            clock,
        },
    );
    let app = test::init_service(build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
    }))
    .await;
    (app, store)
}

/// Send a request, optionally with a bearer token, and decode the JSON body.
/// Empty bodies decode to `Value::Null`.
pub(crate) async fn send<S>(
    app: &S,
    token: Option<&str>,
    req: test::TestRequest,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = match token {
        Some(token) => req.insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        None => req,
    };
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Register an account and return its token and id.
pub(crate) async fn sign_up<S>(app: &S, email: &str, name: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        None,
        test::TestRequest::post().uri("/auth/register").set_json(json!({
            "email": email,
            "password": "hunter22",
            "name": name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let token = body["token"].as_str().expect("token").to_owned();
    let id = body["user"]["id"].as_str().expect("user id").to_owned();
    (token, id)
}

/// Exchange the shared test password for a fresh token.
#[allow(dead_code, reason = "not every integration test re-authenticates")]
pub(crate) async fn log_in<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        None,
        test::TestRequest::post().uri("/auth/login").set_json(json!({
            "email": email,
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

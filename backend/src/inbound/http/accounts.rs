//! Account API handlers.
//!
//! ```text
//! POST /auth/register {"email":"ada@example.com","password":"hunter22","name":"Ada"}
//! POST /auth/login {"email":"ada@example.com","password":"hunter22"}
//! GET /auth/me
//! POST /auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AuthSession, CredentialValidationError, Error, FieldError, LoginCredentials, Registration,
    User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration body. Missing fields deserialise as empty and are reported
/// as `required`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "hunter22")]
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref().to_owned(),
            name: user.display_name.as_ref().to_owned(),
            created_at: user.created_at,
        }
    }
}

/// Bearer token plus the account it was issued for.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.as_str().to_owned(),
            user: UserResponse::from(&session.user),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn credential_errors(errors: Vec<CredentialValidationError>) -> Error {
    Error::validation(errors.iter().map(FieldError::from).collect())
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid fields or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&email, &password, &name).map_err(credential_errors)?;
    let session = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid email or password", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(credential_errors)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

/// Return the signed-in user's account.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.find_user(&caller.user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Acknowledge a sign-out. Tokens are not revoked server-side; clients
/// discard them.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(caller: AuthenticatedUser) -> web::Json<MessageResponse> {
    tracing::info!(user_id = %caller.user_id, "signed out");
    web::Json(MessageResponse {
        message: "logged out".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessToken, UserId};
    use crate::inbound::http::test_utils::{MockPorts, authenticated_as, bearer, sample_user};
    use crate::inbound::http::validation::json_config;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn send(ports: MockPorts, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .app_data(json_config())
                .service(register)
                .service(login)
                .service(current_user)
                .service(logout),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    #[actix_web::test]
    async fn register_returns_created_session() {
        let user_id = UserId::random();
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|reg| reg.email().as_ref() == "ada@example.com")
            .times(1)
            .returning(move |reg| {
                Ok(AuthSession {
                    token: AccessToken::new("signed"),
                    user: sample_user(user_id, reg.display_name().as_ref(), "ada@example.com"),
                })
            });

        let (status, body) = send(
            ports,
            test::TestRequest::post().uri("/auth/register").set_json(json!({
                "email": " Ada@Example.com ",
                "password": "hunter22",
                "name": "Ada"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["token"], "signed");
        assert_eq!(body["user"]["name"], "Ada");
        assert_eq!(body["user"]["id"], user_id.to_string());
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn register_itemises_every_invalid_field() {
        let mut ports = MockPorts::default();
        ports.accounts.expect_register().never();

        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/auth/register")
                .set_json(json!({ "email": "not-an-email", "password": "123" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        let fields: Vec<_> = body["details"]["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .map(|item| item["field"].as_str().expect("field").to_owned())
            .collect();
        assert_eq!(fields, ["email", "name", "password"]);
    }

    #[actix_web::test]
    async fn login_failure_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_login()
            .returning(|_| Err(Error::unauthorized("invalid email or password")));

        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": "wrong-one" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid email or password");
    }

    #[rstest]
    #[case("{", StatusCode::BAD_REQUEST)]
    #[case("42", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn malformed_json_is_bad_request(#[case] raw: &str, #[case] expected: StatusCode) {
        let (status, body) = send(
            MockPorts::default(),
            test::TestRequest::post()
                .uri("/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload(raw.to_owned()),
        )
        .await;

        assert_eq!(status, expected);
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn me_returns_caller_account() {
        let user_id = UserId::random();
        let mut ports = MockPorts {
            authenticator: authenticated_as(user_id),
            ..MockPorts::default()
        };
        ports
            .users
            .expect_find_user()
            .withf(move |id| *id == user_id)
            .returning(|id| Ok(sample_user(*id, "Grace", "grace@example.com")));

        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/auth/me").insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "grace@example.com");
    }

    #[actix_web::test]
    async fn logout_requires_token() {
        let (status, body) = send(
            MockPorts::default(),
            test::TestRequest::post().uri("/auth/logout"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn logout_acknowledges_caller() {
        let ports = MockPorts {
            authenticator: authenticated_as(UserId::random()),
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/auth/logout")
                .insert_header(bearer()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "logged out");
    }
}

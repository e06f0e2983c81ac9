//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need a caller take [`AuthenticatedUser`] as an argument. A
//! request with no usable `Authorization: Bearer` header is rejected with
//! `401`; a token that fails verification is rejected with `403`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AccessClaims, Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER: &str = "bearer";

/// Identity of the caller, taken from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let claims = state.authenticator.authenticate(token).inspect_err(|err| {
        debug!(code = ?err.code(), "rejected bearer token");
    })?;
    Ok(claims.into())
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, TOKEN, authenticated_as};
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_service, init_service, read_body};
    use actix_web::{App, HttpResponse};
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer   abc ", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Basic abc", None)]
    #[case("abc", None)]
    fn parses_bearer_header(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    async fn call(header: Option<&str>) -> (StatusCode, String) {
        let user_id = UserId::random();
        let ports = MockPorts {
            authenticator: authenticated_as(user_id),
            ..MockPorts::default()
        };
        let app = init_service(App::new().app_data(ports.into_state()).route(
            "/whoami",
            web::get().to(|user: AuthenticatedUser| async move {
                HttpResponse::Ok().body(user.user_id.to_string())
            }),
        ))
        .await;
        let mut req = TestRequest::get().uri("/whoami");
        if let Some(header) = header {
            req = req.insert_header((AUTHORIZATION, header));
        }
        let res = call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = read_body(res).await;
        let body = String::from_utf8(body.to_vec()).expect("utf8 body");
        if status == StatusCode::OK {
            assert_eq!(body, user_id.to_string());
        }
        (status, body)
    }

    #[actix_web::test]
    async fn valid_token_yields_caller() {
        let (status, _) = call(Some(&format!("Bearer {TOKEN}"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Token abc"))]
    #[case(Some("Bearer"))]
    #[actix_web::test]
    async fn missing_token_is_unauthorised(#[case] header: Option<&str>) {
        let (status, _) = call(header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn rejected_token_is_forbidden() {
        let (status, body) = call(Some("Bearer forged")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("invalid token"));
    }
}

//! Comment API handlers.
//!
//! ```text
//! GET /comments/task/{taskId}
//! POST /comments {"taskId":"...","body":"Looks good"}
//! POST /comments/{taskId} {"body":"Looks good"}
//! PUT /comments/{id} {"body":"Looks great"}
//! DELETE /comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Comment, CommentBody, CommentId, Error, FieldError, TaskId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::FieldErrors;

/// Body of `POST /comments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub task_id: Option<String>,
    #[schema(example = "Looks good to me")]
    pub body: Option<String>,
}

/// Body carrying only comment text.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentBodyRequest {
    #[schema(example = "Looks good to me")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub task_id: Uuid,
    pub body: String,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            task_id: *comment.task_id.as_uuid(),
            body: comment.body,
            author: AuthorResponse {
                id: *comment.author.id.as_uuid(),
                name: comment.author.display_name,
            },
            created_at: comment.created_at,
        }
    }
}

fn parse_body(errors: &mut FieldErrors, raw: Option<&str>) -> Option<CommentBody> {
    errors.record(CommentBody::new(raw.unwrap_or_default()), |err| {
        FieldError::new("body", err.code(), err.to_string())
    })
}

impl CommentBodyRequest {
    fn into_body(self) -> Result<CommentBody, Error> {
        let mut errors = FieldErrors::new();
        match parse_body(&mut errors, self.body.as_deref()) {
            Some(body) => Ok(body),
            None => Err(errors.into_error()),
        }
    }
}

impl CreateCommentRequest {
    fn into_parts(self) -> Result<(TaskId, CommentBody), Error> {
        let mut errors = FieldErrors::new();
        let task_id = errors
            .require("taskId", self.task_id.as_deref())
            .and_then(|raw| errors.parse_id("taskId", raw, TaskId::new));
        let body = parse_body(&mut errors, self.body.as_deref());
        match (task_id, body) {
            (Some(task_id), Some(body)) if errors.is_empty() => Ok((task_id, body)),
            _ => Err(errors.into_error()),
        }
    }
}

async fn post_comment(
    state: &HttpState,
    caller: &AuthenticatedUser,
    task_id: TaskId,
    body: CommentBody,
) -> ApiResult<HttpResponse> {
    let comment = state.comments.post(&task_id, &caller.user_id, body).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Comments on a task, oldest first.
#[utoipa::path(
    get,
    path = "/comments/task/{taskId}",
    params(("taskId" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/comments/task/{task_id}")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let task_id = TaskId::from_uuid(path.into_inner());
    let comments = state.comments_query.list_for_task(&task_id).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Post a comment, naming the task in the body.
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment posted", body = CommentResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let (task_id, body) = payload.into_inner().into_parts()?;
    post_comment(&state, &caller, task_id, body).await
}

/// Post a comment on the task named in the path.
#[utoipa::path(
    post,
    path = "/comments/{taskId}",
    params(("taskId" = Uuid, Path, description = "Task identifier")),
    request_body = CommentBodyRequest,
    responses(
        (status = 201, description = "Comment posted", body = CommentResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createTaskComment"
)]
#[post("/comments/{task_id}")]
pub async fn create_task_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<CommentBodyRequest>,
) -> ApiResult<HttpResponse> {
    let task_id = TaskId::from_uuid(path.into_inner());
    let body = payload.into_inner().into_body()?;
    post_comment(&state, &caller, task_id, body).await
}

/// Edit a comment. Only its author may do so.
#[utoipa::path(
    put,
    path = "/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment identifier")),
    request_body = CommentBodyRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Not the author, or invalid token", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<CommentBodyRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    let id = CommentId::from_uuid(path.into_inner());
    let body = payload.into_inner().into_body()?;
    let comment = state.comments.edit(&id, &caller.user_id, body).await?;
    Ok(web::Json(comment.into()))
}

/// Delete a comment. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment identifier")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Not the author, or invalid token", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = CommentId::from_uuid(path.into_inner());
    state.comments.delete(&id, &caller.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, UserSummary};
    use crate::inbound::http::test_utils::{MockPorts, authenticated_as, bearer, fixed_now};
    use crate::inbound::http::validation::{json_config, path_config};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn comment(task_id: TaskId, author: UserId, body: &str) -> Comment {
        Comment {
            id: CommentId::random(),
            task_id,
            body: body.to_owned(),
            author: UserSummary {
                id: author,
                display_name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
            },
            created_at: fixed_now(),
        }
    }

    async fn send(ports: MockPorts, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .app_data(json_config())
                .app_data(path_config())
                .service(list_comments)
                .service(create_comment)
                .service(create_task_comment)
                .service(update_comment)
                .service(delete_comment),
        )
        .await;
        let res = test::call_service(&app, req.insert_header(bearer()).to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    fn signed_in_as(user: UserId) -> MockPorts {
        MockPorts {
            authenticator: authenticated_as(user),
            ..MockPorts::default()
        }
    }

    #[actix_web::test]
    async fn both_post_forms_attribute_comment_to_caller() {
        let caller = UserId::random();
        let task_id = TaskId::random();
        for req in [
            test::TestRequest::post()
                .uri("/comments")
                .set_json(json!({ "taskId": task_id.to_string(), "body": " Ship it " })),
            test::TestRequest::post()
                .uri(&format!("/comments/{task_id}"))
                .set_json(json!({ "body": " Ship it " })),
        ] {
            let mut ports = signed_in_as(caller);
            ports
                .comments
                .expect_post()
                .withf(move |task, author, body| {
                    *task == task_id && *author == caller && body.as_ref() == "Ship it"
                })
                .times(1)
                .returning(|task, author, body| Ok(comment(*task, *author, body.as_ref())));

            let (status, body) = send(ports, req).await;

            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["author"]["id"], caller.to_string());
            assert_eq!(body["author"]["name"], "Ada");
            assert_eq!(body["taskId"], task_id.to_string());
            assert!(body["author"].get("email").is_none());
        }
    }

    #[actix_web::test]
    async fn create_reports_missing_task_and_blank_body() {
        let mut ports = signed_in_as(UserId::random());
        ports.comments.expect_post().never();

        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/comments")
                .set_json(json!({ "body": "   " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["details"]["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "taskId");
        assert_eq!(errors[1]["field"], "body");
        assert_eq!(errors[1]["code"], "required");
    }

    #[actix_web::test]
    async fn overlong_body_is_rejected() {
        let mut ports = signed_in_as(UserId::random());
        ports.comments.expect_edit().never();

        let (status, body) = send(
            ports,
            test::TestRequest::put()
                .uri(&format!("/comments/{}", CommentId::random()))
                .set_json(json!({ "body": "x".repeat(1001) })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["errors"][0]["code"], "too_long");
    }

    #[actix_web::test]
    async fn editing_anothers_comment_is_forbidden() {
        let mut ports = signed_in_as(UserId::random());
        ports
            .comments
            .expect_edit()
            .returning(|_, _, _| Err(Error::forbidden("only the author may change this comment")));

        let (status, body) = send(
            ports,
            test::TestRequest::put()
                .uri(&format!("/comments/{}", CommentId::random()))
                .set_json(json!({ "body": "mine now" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "forbidden");
    }

    #[actix_web::test]
    async fn list_preserves_service_order() {
        let task_id = TaskId::random();
        let mut ports = signed_in_as(UserId::random());
        ports
            .comments_query
            .expect_list_for_task()
            .withf(move |id| *id == task_id)
            .returning(|id| {
                Ok(vec![
                    comment(*id, UserId::random(), "first"),
                    comment(*id, UserId::random(), "second"),
                ])
            });

        let (status, body) = send(
            ports,
            test::TestRequest::get().uri(&format!("/comments/task/{task_id}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["body"], "first");
        assert_eq!(body[1]["body"], "second");
    }

    #[actix_web::test]
    async fn delete_returns_no_content() {
        let caller = UserId::random();
        let mut ports = signed_in_as(caller);
        ports
            .comments
            .expect_delete()
            .withf(move |_, actor| *actor == caller)
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, _) = send(
            ports,
            test::TestRequest::delete().uri(&format!("/comments/{}", CommentId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

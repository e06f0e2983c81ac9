//! Users API handlers.
//!
//! ```text
//! GET /users
//! GET /users/me/tasks
//! GET /users/{id}
//! DELETE /users/me
//! ```
//!
//! The `/users/me/...` routes must be registered before `/users/{id}`.

use actix_web::{HttpResponse, delete, get, web};
use uuid::Uuid;

use crate::domain::{TaskFilter, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::accounts::UserResponse;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::{TaskResponse, task_responses};

/// List every user, ordered by name.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Tasks assigned to the caller, newest first.
#[utoipa::path(
    get,
    path = "/users/me/tasks",
    responses(
        (status = 200, description = "Assigned tasks", body = [TaskResponse]),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "myTasks"
)]
#[get("/users/me/tasks")]
pub async fn my_tasks(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let filter = TaskFilter::assigned_to(caller.user_id);
    let views = state.tasks_query.list_tasks(&filter).await?;
    Ok(web::Json(task_responses(views)))
}

/// Delete the caller's account. Their comments go with it and their tasks
/// become unassigned.
#[utoipa::path(
    delete,
    path = "/users/me",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteMe"
)]
#[delete("/users/me")]
pub async fn delete_me(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.accounts.delete_account(&caller.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .users
        .find_user(&UserId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

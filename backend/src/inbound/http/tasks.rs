//! Task API handlers.
//!
//! ```text
//! GET /tasks?status=in_progress&assigneeId=...
//! POST /tasks {"title":"Write release notes","priority":"high"}
//! GET /tasks/{id}
//! PUT /tasks/{id} {"status":"done","dueDate":null}
//! DELETE /tasks/{id}
//! ```
//!
//! Every task in a response carries its badge, computed when it was read.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    Error, FieldError, TaskChanges, TaskDraft, TaskFilter, TaskId, TaskPriority, TaskStatus,
    TaskTitle, TaskTitleError, TaskView, UserId, UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, deserialize_some};

/// Body of `POST /tasks`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[schema(example = "Write release notes")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "high")]
    pub priority: Option<String>,
    #[schema(example = "backlog")]
    pub status: Option<String>,
    pub assignee_id: Option<String>,
    #[schema(example = "2026-03-14T17:00:00Z")]
    pub due_date: Option<String>,
}

/// Body of `PUT /tasks/{id}`.
///
/// Absent fields are left alone. `null` clears `description`, `assigneeId`
/// and `dueDate`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub assignee_id: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
}

/// Filters accepted by `GET /tasks`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// One of `backlog`, `in_progress`, `review`, `done`.
    pub status: Option<String>,
    /// One of `low`, `medium`, `high`.
    pub priority: Option<String>,
    pub assignee_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AssigneeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserSummary> for AssigneeResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            name: summary.display_name,
            email: summary.email,
        }
    }
}

/// Task as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "medium")]
    pub priority: String,
    #[schema(example = "in_progress")]
    pub status: String,
    pub assignee_id: Option<Uuid>,
    pub assignee: Option<AssigneeResponse>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Deadline health as of the read: `on_track`, `at_risk` or `overdue`.
    #[schema(example = "at_risk")]
    pub badge: String,
}

impl From<TaskView> for TaskResponse {
    fn from(view: TaskView) -> Self {
        let TaskView { task, badge } = view;
        let assignee_id = task.assignee_id().map(Uuid::from);
        Self {
            id: *task.id.as_uuid(),
            title: task.title,
            description: task.description,
            priority: task.priority.as_str().to_owned(),
            status: task.status.as_str().to_owned(),
            assignee_id,
            assignee: task.assignee.map(AssigneeResponse::from),
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
            badge: badge.as_str().to_owned(),
        }
    }
}

pub(crate) fn task_responses(views: Vec<TaskView>) -> Vec<TaskResponse> {
    views.into_iter().map(TaskResponse::from).collect()
}

fn title_error(err: TaskTitleError) -> FieldError {
    FieldError::new("title", err.code(), err.to_string())
}

impl CreateTaskRequest {
    fn into_draft(self) -> Result<TaskDraft, Error> {
        let mut errors = FieldErrors::new();
        let title = errors.record(
            TaskTitle::new(self.title.as_deref().unwrap_or_default()),
            title_error,
        );
        let priority = self
            .priority
            .as_deref()
            .and_then(|raw| errors.parse_enum::<TaskPriority>("priority", raw));
        let status = self
            .status
            .as_deref()
            .and_then(|raw| errors.parse_enum::<TaskStatus>("status", raw));
        let assignee_id = self
            .assignee_id
            .as_deref()
            .and_then(|raw| errors.parse_id("assigneeId", raw, UserId::new));
        let due_date = self
            .due_date
            .as_deref()
            .and_then(|raw| errors.parse_timestamp("dueDate", raw));

        match title {
            Some(title) if errors.is_empty() => Ok(TaskDraft {
                title,
                description: self.description,
                priority,
                status,
                assignee_id,
                due_date,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

impl UpdateTaskRequest {
    fn into_changes(self) -> Result<TaskChanges, Error> {
        let mut errors = FieldErrors::new();
        let title = self
            .title
            .map(|raw| TaskTitle::new(raw.unwrap_or_default()))
            .and_then(|parsed| errors.record(parsed, title_error));
        let priority = self
            .priority
            .as_deref()
            .and_then(|raw| errors.parse_enum::<TaskPriority>("priority", raw));
        let status = self
            .status
            .as_deref()
            .and_then(|raw| errors.parse_enum::<TaskStatus>("status", raw));
        let assignee_id = self.assignee_id.map(|raw| {
            raw.as_deref()
                .and_then(|raw| errors.parse_id("assigneeId", raw, UserId::new))
        });
        let due_date = self.due_date.map(|raw| {
            raw.as_deref()
                .and_then(|raw| errors.parse_timestamp("dueDate", raw))
        });

        errors.finish()?;
        Ok(TaskChanges {
            title,
            description: self.description,
            priority,
            status,
            assignee_id,
            due_date,
        })
    }
}

impl TaskListQuery {
    fn into_filter(self) -> Result<TaskFilter, Error> {
        let mut errors = FieldErrors::new();
        let filter = TaskFilter {
            status: self
                .status
                .as_deref()
                .and_then(|raw| errors.parse_enum("status", raw)),
            priority: self
                .priority
                .as_deref()
                .and_then(|raw| errors.parse_enum("priority", raw)),
            assignee_id: self
                .assignee_id
                .as_deref()
                .and_then(|raw| errors.parse_id("assigneeId", raw, UserId::new)),
        };
        errors.finish()?;
        Ok(filter)
    }
}

/// List tasks, newest first.
#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tasks", body = [TaskResponse]),
        (status = 400, description = "Unknown filter value", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<TaskListQuery>,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let filter = query.into_inner().into_filter()?;
    let views = state.tasks_query.list_tasks(&filter).await?;
    Ok(web::Json(task_responses(views)))
}

/// Create a task. Priority defaults to `medium` and status to `backlog`.
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid fields or unknown assignee", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let view = state.tasks.create(draft).await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(view)))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = TaskId::from_uuid(path.into_inner());
    let view = state.tasks_query.get_task(&id).await?;
    Ok(web::Json(view.into()))
}

/// Apply a partial update and refresh `updatedAt`.
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Invalid fields or unknown assignee", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateTaskRequest>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = TaskId::from_uuid(path.into_inner());
    let changes = payload.into_inner().into_changes()?;
    let view = state.tasks.update(&id, changes).await?;
    Ok(web::Json(view.into()))
}

/// Delete a task and its comments.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = TaskId::from_uuid(path.into_inner());
    state.tasks.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

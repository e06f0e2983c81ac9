//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated with `#[utoipa::path]`, the
//! request and response DTOs, and the error schemas. Swagger UI serves it at
//! `/docs` in debug builds; `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::accounts::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse,
};
use crate::inbound::http::comments::{
    AuthorResponse, CommentBodyRequest, CommentResponse, CreateCommentRequest,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, FieldErrorSchema, ValidationDetailsSchema,
};
use crate::inbound::http::tasks::{
    AssigneeResponse, CreateTaskRequest, TaskResponse, UpdateTaskRequest,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_owned());
        bearer.description =
            Some("Access token issued by POST /auth/login or /auth/register.".to_owned());
        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taskboard API",
        description = "Team task tracking with deadline badges and comments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::create_task_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::my_tasks,
        crate::inbound::http::users::delete_me,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        MessageResponse,
        CreateTaskRequest,
        UpdateTaskRequest,
        TaskResponse,
        AssigneeResponse,
        CreateCommentRequest,
        CommentBodyRequest,
        CommentResponse,
        AuthorResponse,
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema,
        ValidationDetailsSchema,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and the current account"),
        (name = "tasks", description = "Tasks with their deadline badge"),
        (name = "comments", description = "Discussion on tasks"),
        (name = "users", description = "Team members and their assignments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

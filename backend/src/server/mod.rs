//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{Repositories, Security, build_http_state};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::accounts::{current_user, login, logout, register};
use crate::inbound::http::comments::{
    create_comment, create_task_comment, delete_comment, list_comments, update_comment,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::{create_task, delete_task, get_task, list_tasks, update_task};
use crate::inbound::http::users::{delete_me, get_user, list_users, my_tasks};
use crate::inbound::http::validation::{json_config, path_config, query_config};
use crate::middleware::Trace;

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
}

/// Assemble the application: extractor configs, trace middleware and every
/// route. `/users/me/...` is registered ahead of `/users/{id}`.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(register)
        .service(login)
        .service(current_user)
        .service(logout)
        .service(list_tasks)
        .service(create_task)
        .service(get_task)
        .service(update_task)
        .service(delete_task)
        .service(list_comments)
        .service(create_comment)
        .service(create_task_comment)
        .service(update_comment)
        .service(delete_comment)
        .service(list_users)
        .service(my_tasks)
        .service(delete_me)
        .service(get_user)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        jwt_secret,
        token_ttl,
    } = config;
    let http_state = web::Data::new(build_http_state(
        Repositories::diesel(&db_pool),
        Security {
            jwt_secret: &jwt_secret,
            token_ttl,
            clock: Arc::new(DefaultClock),
        },
    ));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

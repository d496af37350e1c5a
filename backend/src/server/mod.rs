//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{TaskService, UserService};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::{
    create_task, delete_all_tasks, delete_task, get_task, get_task_by_title, list_tasks,
    update_task,
};
use crate::inbound::http::users::{
    delete_user, get_user, get_user_by_username, list_users, update_user,
};
use crate::outbound::memory::{InMemoryTaskStore, InMemoryUserStore};
use crate::outbound::persistence::{DieselTaskRepository, DieselUserRepository};

/// Build the services from configuration: database-backed repositories when
/// a pool is attached, in-memory stores otherwise.
fn build_services(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => HttpState::new(
            TaskService::new(Arc::new(DieselTaskRepository::new(pool.clone()))),
            UserService::new(Arc::new(DieselUserRepository::new(pool.clone()))),
        ),
        None => HttpState::new(
            TaskService::new(Arc::new(InMemoryTaskStore::new())),
            UserService::new(Arc::new(InMemoryUserStore::new())),
        ),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
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

    let api = web::scope("/api")
        .service(list_tasks)
        .service(get_task_by_title)
        .service(get_task)
        .service(create_task)
        .service(update_task)
        .service(delete_task)
        .service(delete_all_tasks)
        .service(list_users)
        .service(get_user_by_username)
        .service(get_user)
        .service(update_user)
        .service(delete_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_services(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every task, user, and health endpoint from the inbound
//! layer plus the request/response and error schemas. Swagger UI serves the
//! document in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::tasks::{TaskResponse, TaskUpsertRequest};
use crate::inbound::http::users::{UserResponse, UserUpdateRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task manager backend API",
        description = "CRUD interface over task and user stores, with health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::get_task_by_title,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::delete_all_tasks,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TaskResponse,
        TaskUpsertRequest,
        UserResponse,
        UserUpdateRequest,
        Error,
        ErrorCode
    )),
    tags(
        (name = "tasks", description = "Operations on the task store"),
        (name = "users", description = "Operations on the user store"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

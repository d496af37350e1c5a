//! Task API handlers.
//!
//! ```text
//! GET    /api/tasks
//! GET    /api/tasks/{id}
//! GET    /api/tasks/by-title/{title}
//! POST   /api/tasks
//! PUT    /api/tasks/{id}
//! DELETE /api/tasks/{id}
//! DELETE /api/tasks
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, http::header, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    ApiResult, Error, NewTask, Patch, Task, TaskDescription, TaskId, TaskPatch, TaskTitle,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_task_validation_error, missing_field_error};

/// Distinguish an absent field from an explicit `null`: absent deserialises
/// to `None`, `null` to `Some(None)`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Request body shared by `POST /api/tasks` and `PUT /api/tasks/{id}`.
///
/// On create, `title` is required and a missing `completed` defaults to
/// false. On update every field is optional: an absent or `null` `title` or
/// `completed` keeps the current value, while `description` distinguishes
/// absent (keep) from `null` (clear).
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TaskUpsertRequest {
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Task representation returned by every task endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().get(),
            title: task.title().as_ref().to_owned(),
            description: task.description().map(|value| value.as_ref().to_owned()),
            completed: task.completed(),
        }
    }
}

fn parse_new_task(request: TaskUpsertRequest) -> Result<NewTask, Error> {
    let raw_title = request.title.ok_or_else(|| missing_field_error("title"))?;
    let title = TaskTitle::new(raw_title).map_err(map_task_validation_error)?;

    // An explicit null description on create is the same as leaving it out.
    let description = request
        .description
        .flatten()
        .map(TaskDescription::new)
        .transpose()
        .map_err(map_task_validation_error)?;

    Ok(NewTask {
        title,
        description,
        completed: request.completed.unwrap_or(false),
    })
}

fn parse_task_patch(request: TaskUpsertRequest) -> Result<TaskPatch, Error> {
    let title = match request.title {
        Some(raw) => Patch::Set(TaskTitle::new(raw).map_err(map_task_validation_error)?),
        None => Patch::Keep,
    };

    let description = match request.description {
        None => Patch::Keep,
        Some(None) => Patch::Set(None),
        Some(Some(raw)) => Patch::Set(Some(
            TaskDescription::new(raw).map_err(map_task_validation_error)?,
        )),
    };

    let completed = request.completed.map_or(Patch::Keep, Patch::Set);

    Ok(TaskPatch {
        title,
        description,
        completed,
    })
}

/// List all tasks in identifier order.
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks", body = [TaskResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.find_all().await?;
    Ok(web::Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Fetch a single task.
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 404, description = "No such task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "getTask"
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = TaskId::new(path.into_inner());
    match state.tasks.find_by_id(id).await? {
        Some(task) => Ok(web::Json(task.into())),
        None => Err(Error::not_found(format!("no task with id {id}"))),
    }
}

/// Fetch a task by its unique title.
#[utoipa::path(
    get,
    path = "/api/tasks/by-title/{title}",
    params(("title" = String, Path, description = "Task title")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 400, description = "Invalid title", body = Error),
        (status = 404, description = "No such task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "getTaskByTitle"
)]
#[get("/tasks/by-title/{title}")]
pub async fn get_task_by_title(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TaskResponse>> {
    let title = TaskTitle::new(path.into_inner()).map_err(map_task_validation_error)?;
    match state.tasks.find_by_title(&title).await? {
        Some(task) => Ok(web::Json(task.into())),
        None => Err(Error::not_found(format!("no task with title \"{title}\""))),
    }
}

/// Create a task. Responds 201 with a `Location` header pointing at the new
/// resource.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = TaskUpsertRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse,
            headers(("Location" = String, description = "URL of the created task"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Title already taken", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    payload: web::Json<TaskUpsertRequest>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let new_task = parse_new_task(payload.into_inner())?;
    let task = state.tasks.create(new_task).await?;

    let location = format!("{}/{}", request.path(), task.id());
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(TaskResponse::from(task)))
}

/// Partially update a task.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    request_body = TaskUpsertRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No such task", body = Error),
        (status = 409, description = "Title already taken", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<TaskUpsertRequest>,
) -> ApiResult<web::Json<TaskResponse>> {
    let patch = parse_task_patch(payload.into_inner())?;
    let task = state
        .tasks
        .update(TaskId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(task.into()))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = i64, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "No such task", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .tasks
        .delete_by_id(TaskId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete every task.
#[utoipa::path(
    delete,
    path = "/api/tasks",
    responses((status = 204, description = "All tasks deleted")),
    tags = ["tasks"],
    operation_id = "deleteAllTasks"
)]
#[delete("/tasks")]
pub async fn delete_all_tasks(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.tasks.delete_all().await?;
    Ok(HttpResponse::NoContent().finish())
}

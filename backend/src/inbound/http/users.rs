//! User API handlers.
//!
//! Users are created out of band, so this adapter exposes read, update, and
//! delete only. Responses never carry the password.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! GET    /api/users/by-username/{username}
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ApiResult, EmailAddress, Error, Patch, User, UserId, UserPatch, Username,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;

/// Request body for `PUT /api/users/{id}`. Absent or `null` fields keep
/// their current values; neither field is clearable.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// User representation returned by every user endpoint. The password is
/// deliberately absent.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
        }
    }
}

fn parse_user_patch(request: UserUpdateRequest) -> Result<UserPatch, Error> {
    let username = match request.username {
        Some(raw) => Patch::Set(Username::new(raw).map_err(map_user_validation_error)?),
        None => Patch::Keep,
    };
    let email = match request.email {
        Some(raw) => Patch::Set(EmailAddress::new(raw).map_err(map_user_validation_error)?),
        None => Patch::Keep,
    };
    Ok(UserPatch { username, email })
}

/// List all users in identifier order.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.find_all().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    match state.users.find_by_id(id).await? {
        Some(user) => Ok(web::Json(user.into())),
        None => Err(Error::not_found(format!("no user with id {id}"))),
    }
}

/// Fetch a user by username.
#[utoipa::path(
    get,
    path = "/api/users/by-username/{username}",
    params(("username" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid username", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserByUsername"
)]
#[get("/users/by-username/{username}")]
pub async fn get_user_by_username(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let username = Username::new(path.into_inner()).map_err(map_user_validation_error)?;
    match state.users.find_by_username(&username).await? {
        Some(user) => Ok(web::Json(user.into())),
        None => Err(Error::not_found(format!("no user named \"{username}\""))),
    }
}

/// Partially update a user's username and email.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 409, description = "Username or email already taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let patch = parse_user_patch(payload.into_inner())?;
    let user = state
        .users
        .update(UserId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(user.into()))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .users
        .delete_by_id(UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

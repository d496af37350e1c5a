//! Domain primitives, aggregates, and use-cases.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the transport-agnostic error payload, and the services holding
//! the conflict-resolving update logic. Types stay immutable apart from
//! explicit `apply(patch)` merges; invariants are documented on each type.

pub mod error;
pub mod patch;
pub mod ports;
pub mod task;
mod task_service;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::patch::{Patch, TaskPatch, UserPatch};
pub use self::task::{NewTask, Task, TaskDescription, TaskId, TaskTitle, TaskValidationError};
pub use self::task_service::TaskService;
pub use self::user::{EmailAddress, NewUser, Password, User, UserId, UserValidationError, Username};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nothing here"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

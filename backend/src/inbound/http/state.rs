//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and remain testable without I/O.

use crate::domain::{TaskService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tasks: TaskService,
    pub users: UserService,
}

impl HttpState {
    /// Bundle the two services for handler injection.
    pub fn new(tasks: TaskService, users: UserService) -> Self {
        Self { tasks, users }
    }
}

//! Domain ports for the hexagonal boundary.
//!
//! Services depend on these traits only; `outbound` provides the in-memory
//! and Diesel-backed adapters.

mod task_repository;
mod user_repository;

#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

//! Port abstraction for task persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::task::{NewTask, Task, TaskId, TaskTitle};

/// Persistence errors raised by task repository adapters.
///
/// Absence is never an error: lookups return `Ok(None)`. `Duplicate` is the
/// store-level uniqueness signal, distinct from not-found, and carries the
/// offending field so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskRepositoryError {
    /// Repository connection could not be established.
    #[error("task repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("task repository query failed: {message}")]
    Query { message: String },
    /// A uniqueness constraint was violated.
    #[error("duplicate {field}: {value}")]
    Duplicate { field: String, value: String },
}

impl TaskRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-field error naming the offending field and value.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Port for task storage and retrieval.
///
/// Identity assignment is owned by the store: `add` hands out the next
/// sequential identifier atomically, and identifiers are never reused, even
/// after deletion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a new task under the next sequential identifier and return the
    /// stored record. Rejects a duplicate title with
    /// [`TaskRepositoryError::Duplicate`].
    async fn add(&self, task: NewTask) -> Result<Task, TaskRepositoryError>;

    /// Fetch a task by identifier; absence is `Ok(None)`.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Fetch the task holding the given title, if any.
    async fn find_by_title(
        &self,
        title: &TaskTitle,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Snapshot of all tasks in insertion (identifier) order.
    async fn find_all(&self) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Persist the task's current state under its identifier, re-inserting
    /// the record if it has vanished. Surfaces uniqueness violations as
    /// [`TaskRepositoryError::Duplicate`].
    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Remove and return the task with the given identifier; `Ok(None)` when
    /// no such task exists, leaving the store untouched.
    async fn delete_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError>;

    /// Clear the store. Intended for test and reset scenarios.
    async fn delete_all(&self) -> Result<(), TaskRepositoryError>;
}

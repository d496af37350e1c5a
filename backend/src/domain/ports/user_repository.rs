//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, NewUser, User, UserId, Username};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// A uniqueness constraint was violated. `field` is `username` or
    /// `email`, whichever collided.
    #[error("duplicate {field}: {value}")]
    Duplicate { field: String, value: String },
}

impl UserRepositoryError {
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

/// Port for user storage and retrieval. Same identity rules as
/// [`TaskRepository`](super::TaskRepository): the store assigns sequential,
/// never-reused identifiers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under the next sequential identifier. Rejects a
    /// duplicate username or email with [`UserRepositoryError::Duplicate`].
    async fn add(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch a user by identifier; absence is `Ok(None)`.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user holding the given username, if any.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user holding the given email address, if any.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Snapshot of all users in insertion (identifier) order.
    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Persist the user's current state under its identifier. Surfaces
    /// uniqueness violations as [`UserRepositoryError::Duplicate`].
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Remove and return the user with the given identifier; `Ok(None)` when
    /// absent.
    async fn delete_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Clear the store. Intended for test and reset scenarios.
    async fn delete_all(&self) -> Result<(), UserRepositoryError>;
}

//! Shared Diesel error mapping for the repository adapters.
//!
//! Uniqueness violations deserve special care: the optimistic pre-check in
//! the services can lose a race, at which point PostgreSQL reports the
//! constraint here. The violation's constraint name and message are
//! inspected for a known unique field so the adapter can re-raise the same
//! duplicate error the pre-check would have produced; a violation naming no
//! known field stays a plain query error.

use tracing::debug;

use crate::domain::ports::{TaskRepositoryError, UserRepositoryError};

use super::pool::PoolError;

/// Constructor surface shared by the repository error enums, so the mapping
/// below is written once.
pub(super) trait RepositoryError {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
    fn duplicate(field: String, value: String) -> Self;
}

impl RepositoryError for TaskRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }

    fn duplicate(field: String, value: String) -> Self {
        Self::Duplicate { field, value }
    }
}

impl RepositoryError for UserRepositoryError {
    fn connection(message: String) -> Self {
        Self::Connection { message }
    }

    fn query(message: String) -> Self {
        Self::Query { message }
    }

    fn duplicate(field: String, value: String) -> Self {
        Self::Duplicate { field, value }
    }
}

/// Map pool failures to the adapter's connection error.
pub(super) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map Diesel errors to the adapter's error type.
///
/// `unique_fields` lists the `(field, attempted value)` pairs the current
/// statement could collide on; a `UniqueViolation` whose constraint name or
/// message mentions one of the fields becomes `duplicate` for that field.
pub(super) fn map_diesel_error<E: RepositoryError>(
    error: diesel::result::Error,
    unique_fields: &[(&str, &str)],
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let description = format!(
                "{} {}",
                info.constraint_name().unwrap_or_default(),
                info.message()
            )
            .to_lowercase();
            for (field, value) in unique_fields {
                if description.contains(field) {
                    return E::duplicate((*field).to_owned(), (*value).to_owned());
                }
            }
            E::query(format!(
                "unique constraint violated: {}",
                info.message()
            ))
        }
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        _ => E::query("database error".to_owned()),
    }
}

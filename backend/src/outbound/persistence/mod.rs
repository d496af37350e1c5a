//! PostgreSQL persistence adapters.
//!
//! Diesel-backed implementations of the repository ports, plus the async
//! connection pool and the embedded migrations run at startup.

mod diesel_task_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
pub mod schema;

pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection as _;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while bringing the schema up to date.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be established.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Migration { message: String },
}

/// Apply any pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built, so startup either has a current
/// schema or a clear error.
pub fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Migration {
            message: err.to_string(),
        })?;

    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

mod pg_file_repository;
mod pg_session_repository;
mod pg_user_repository;

pub use pg_file_repository::PgFileRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;

use crate::application::error::ApplicationError;

/// Unique-constraint violations are reported as conflicts, everything else
/// as a persistence failure.
pub(crate) fn database_error(error: sqlx::Error) -> ApplicationError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            ApplicationError::Conflict(db_error.message().to_string())
        }
        _ => ApplicationError::PersistenceError(error.to_string()),
    }
}

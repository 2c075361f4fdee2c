// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_budget_repository;
pub mod postgres_user_repository;

pub use in_memory::{InMemoryBudgetRepository, InMemoryUserRepository};
pub use postgres_budget_repository::PostgresBudgetRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

/// Translates a sqlx failure into the domain's repository error
///
/// Constraint violations keep the constraint name so callers can tell which
/// rule was broken.
pub(crate) fn map_db_error(err: sqlx::Error, context: &str) -> RepositoryError {
    if let Some(db) = err.as_database_error() {
        let constraint = db.constraint().unwrap_or("unknown").to_string();
        if db.is_unique_violation() {
            return RepositoryError::UniqueViolation(constraint);
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::ForeignKeyViolation(constraint);
        }
    }

    tracing::error!(error = %err, "{}", context);
    RepositoryError::Database(format!("{}: {}", context, err))
}

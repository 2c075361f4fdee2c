// Repository contracts (ports)
// Adapters in infrastructure::repositories implement these traits

pub mod budget_repository;
pub mod user_repository;

use thiserror::Error;
use uuid::Uuid;

pub use budget_repository::{BudgetFilter, BudgetRepository};
pub use user_repository::UserRepository;

/// Failures reported by a repository implementation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("{entity} {id} has a newer version")]
    StaleVersion { entity: &'static str, id: Uuid },

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

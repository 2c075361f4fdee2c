use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use super::repositories::RepositoryError;

/// Errors produced by the application pipeline
///
/// Every service operation returns one of these. The API layer maps each
/// variant to a status code; only `Unknown` hides its detail from callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Referenced entity not found for {field}: {id}")]
    ReferenceNotFound { field: &'static str, id: Uuid },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            RepositoryError::UniqueViolation(constraint) => {
                DomainError::Constraint(format!("Duplicate value violates {}", constraint))
            }
            RepositoryError::ForeignKeyViolation(constraint) => {
                DomainError::Constraint(format!("Reference violates {}", constraint))
            }
            RepositoryError::StaleVersion { entity, id } => DomainError::Conflict(format!(
                "{} {} was modified by another request; reload and retry",
                entity, id
            )),
            RepositoryError::Database(message) => DomainError::Unknown(message),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_version_maps_to_conflict() {
        let id = Uuid::new_v4();
        let err: DomainError = RepositoryError::StaleVersion {
            entity: "Budget",
            id,
        }
        .into();

        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains(&id.to_string())));
    }

    #[test]
    fn unique_violation_maps_to_constraint() {
        let err: DomainError =
            RepositoryError::UniqueViolation("budgets_budget_number_key".to_string()).into();

        assert!(matches!(err, DomainError::Constraint(msg) if msg.contains("budget_number")));
    }

    #[test]
    fn database_error_maps_to_unknown() {
        let err: DomainError = RepositoryError::Database("connection reset".to_string()).into();
        assert!(matches!(err, DomainError::Unknown(_)));
    }
}

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::errors::DomainError;
use crate::domain::validation::violation_messages;

/// One invalid field in a 400 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API error type with HTTP status code and message
///
/// Serialized as `{ "error": message }`, plus `code` when the client needs
/// to tell similar statuses apart and `errors` for validation failures.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<&'static str>,
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            errors: Vec::new(),
        }
    }

    /// Attaches a machine-readable code
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message).with_code("not_found")
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>, code: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message).with_code(code)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Creates a 400 error listing every invalid field
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors,
            ..Self::bad_request("Validation failed")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.message
        });

        if let Some(code) = self.code {
            body["code"] = json!(code);
        }
        if !self.errors.is_empty() {
            body["errors"] = json!(self.errors);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::validation(
                violation_messages(&errors)
                    .into_iter()
                    .map(|(field, message)| FieldError { field, message })
                    .collect(),
            ),
            DomainError::Forbidden(reason) => ApiError::forbidden(reason),
            DomainError::Unauthenticated(reason) => ApiError::unauthorized(reason),
            e @ DomainError::NotFound { .. } => ApiError::not_found(e.to_string()),
            e @ DomainError::ReferenceNotFound { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, e.to_string()).with_code("reference_not_found")
            }
            DomainError::Constraint(message) => ApiError::conflict(message, "constraint_violation"),
            DomainError::Conflict(message) => ApiError::conflict(message, "stale_write"),
            DomainError::Unknown(detail) => {
                tracing::error!(error = %detail, "Unhandled error");
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use validator::ValidationErrors;

    use crate::domain::validation::add_violation;

    #[test]
    fn validation_lists_every_field() {
        let mut errors = ValidationErrors::new();
        add_violation(&mut errors, "clientName", "blank", "clientName cannot be empty");
        add_violation(&mut errors, "status", "invalid", "Invalid status");

        let api: ApiError = DomainError::Validation(errors).into();

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.errors.len(), 2);
        assert_eq!(api.errors[0].field, "clientName");
    }

    #[test]
    fn reference_not_found_is_distinguishable() {
        let api: ApiError = DomainError::ReferenceNotFound {
            field: "responsibleId",
            id: Uuid::new_v4(),
        }
        .into();

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.code, Some("reference_not_found"));
    }

    #[test]
    fn conflicts_carry_distinct_codes() {
        let stale: ApiError = DomainError::Conflict("stale".to_string()).into();
        let dup: ApiError = DomainError::Constraint("dup".to_string()).into();

        assert_eq!(stale.status, StatusCode::CONFLICT);
        assert_eq!(stale.code, Some("stale_write"));
        assert_eq!(dup.code, Some("constraint_violation"));
    }

    #[test]
    fn unknown_hides_detail() {
        let api: ApiError = DomainError::Unknown("password=hunter2".to_string()).into();

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("hunter2"));
    }
}

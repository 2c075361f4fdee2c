use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::domain::policy::Principal;
use crate::state::AppState;

/// JWT authentication extractor for protected routes
///
/// Resolves the bearer token into the [`Principal`] making the request.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(principal): JwtAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", principal.user_id))
/// }
/// ```
pub struct JwtAuth(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Extract the authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        // Extract bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let principal = state.auth.authenticate(token)?;

        Ok(JwtAuth(principal))
    }
}

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::application::auth_service::{ForgotPasswordPayload, LoginPayload, ResetPasswordPayload};
use crate::domain::user::{Role, User};
use crate::state::AppState;

/// The signed-in user as returned by login and `/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
        }
    }
}

/// Response from successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub must_change_password: bool,
    pub user: SessionUser,
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = body?;
    let session = state.auth.login(payload).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        must_change_password: session.user.must_change_password,
        user: SessionUser::from(&session.user),
    }))
}

/// Request a password reset token
///
/// POST /api/auth/forgot-password
///
/// Always answers 202 so callers cannot probe which emails exist.
pub async fn forgot_password(
    State(state): State<AppState>,
    body: Result<Json<ForgotPasswordPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = body?;
    let token = state.auth.forgot_password(payload).await?;

    let mut response = json!({
        "message": "If the email is registered, password reset instructions have been issued"
    });
    if state.config.expose_reset_token {
        if let Some(token) = token {
            response["resetToken"] = json!(token);
        }
    }

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Set a new password with a reset token
///
/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    body: Result<Json<ResetPasswordPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    state.auth.reset_password(payload).await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// Current user
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
) -> Result<Json<SessionUser>, ApiError> {
    let user = state.auth.me(&principal).await?;
    Ok(Json(SessionUser::from(&user)))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

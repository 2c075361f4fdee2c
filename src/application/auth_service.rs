use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::auth::jwt::{create_reset_token, create_token, verify_token, TokenKind};
use crate::auth::password::{hash_password_async, verify_password_async, MIN_PASSWORD_LENGTH};
use crate::config::JwtConfig;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::policy::Principal;
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, User};
use crate::domain::validation::{add_violation, non_blank};

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordPayload {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordPayload {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Credential checks and token issuance
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Exchanges email and password for an access token
    ///
    /// Unknown emails, wrong passwords and deactivated accounts all fail with
    /// the same message.
    pub async fn login(&self, payload: LoginPayload) -> DomainResult<Session> {
        let mut errors = ValidationErrors::new();
        let email = non_blank(&mut errors, "email", payload.email, true);
        let password = payload.password.filter(|p| !p.is_empty());
        if password.is_none() {
            add_violation(&mut errors, "password", "required", "Password is required");
        }

        let (Some(email), Some(password)) = (email, password) else {
            return Err(errors.into());
        };

        let email = Email::new(email).map_err(|_| DomainError::Unauthenticated(BAD_CREDENTIALS.to_string()))?;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::info!(email = %email, "Login rejected");
                return Err(DomainError::Unauthenticated(BAD_CREDENTIALS.to_string()));
            }
        };

        let valid = verify_password_async(password, user.password_hash.clone())
            .await
            .map_err(DomainError::Unknown)?;
        if !valid {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::Unauthenticated(BAD_CREDENTIALS.to_string()));
        }

        let token = create_token(user.id, user.role, &self.jwt.secret, self.jwt.ttl_hours)
            .map_err(DomainError::Unknown)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session { token, user })
    }

    /// Issues a one-hour reset token for an active user
    ///
    /// Returns `None` for unknown emails so callers can answer identically
    /// either way. The token is logged for out-of-band delivery.
    pub async fn forgot_password(&self, payload: ForgotPasswordPayload) -> DomainResult<Option<String>> {
        let mut errors = ValidationErrors::new();
        let Some(raw) = non_blank(&mut errors, "email", payload.email, true) else {
            return Err(errors.into());
        };

        let Ok(email) = Email::new(raw) else {
            return Ok(None);
        };

        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::debug!(email = %email, "Password reset requested for unknown email");
                return Ok(None);
            }
        };

        let token = create_reset_token(user.id, user.role, &self.jwt.secret).map_err(DomainError::Unknown)?;

        tracing::info!(user_id = %user.id, reset_token = %token, "Password reset token issued");
        Ok(Some(token))
    }

    /// Sets a new password using a reset token and clears the rotation flag
    pub async fn reset_password(&self, payload: ResetPasswordPayload) -> DomainResult<()> {
        let mut errors = ValidationErrors::new();
        let token = non_blank(&mut errors, "token", payload.token, true);
        let password = match payload.password {
            Some(p) if p.chars().count() >= MIN_PASSWORD_LENGTH => Some(p),
            Some(_) => {
                add_violation(
                    &mut errors,
                    "password",
                    "length",
                    format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
                );
                None
            }
            None => {
                add_violation(&mut errors, "password", "required", "Password is required");
                None
            }
        };

        let (Some(token), Some(password)) = (token, password) else {
            return Err(errors.into());
        };

        let claims = verify_token(&token, &self.jwt.secret, TokenKind::Reset)
            .map_err(|_| DomainError::Unauthenticated("Invalid or expired reset token".to_string()))?;

        if self.users.find_by_id(claims.sub).await?.is_none() {
            return Err(DomainError::Unauthenticated(
                "Invalid or expired reset token".to_string(),
            ));
        }

        let hash = hash_password_async(password).await.map_err(DomainError::Unknown)?;
        self.users.update_password(claims.sub, &hash, false).await?;

        tracing::info!(user_id = %claims.sub, "Password reset");
        Ok(())
    }

    /// Resolves a bearer token into the principal it identifies
    pub fn authenticate(&self, token: &str) -> DomainResult<Principal> {
        let claims = verify_token(token, &self.jwt.secret, TokenKind::Access)
            .map_err(|e| DomainError::Unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(Principal::new(claims.sub, claims.role))
    }

    pub async fn me(&self, principal: &Principal) -> DomainResult<User> {
        self.find(principal.user_id).await
    }

    async fn find(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "User", id })
    }
}

// JWT token creation and verification
// Access tokens carry the user's role; reset tokens only authorize a password reset

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::Role;

/// Lifetime of a password reset token
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Reset,
}

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `role` - Role of the user when the token was issued
/// * `kind` - Access or reset token
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Role claim
    pub role: Role,
    /// Token purpose
    pub kind: TokenKind,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Creates an access token for a user
///
/// # Arguments
/// * `user_id` - The user's ID to include in the token
/// * `role` - The user's role
/// * `secret` - The secret key for signing
/// * `ttl_hours` - Hours until the token expires
///
/// # Example
/// ```
/// use zeus_api::auth::jwt::create_token;
/// use zeus_api::domain::user::Role;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), Role::Admin, "your-secret-key", 8).expect("valid token");
/// assert!(!token.is_empty());
/// ```
pub fn create_token(user_id: Uuid, role: Role, secret: &str, ttl_hours: i64) -> Result<String, String> {
    sign(user_id, role, TokenKind::Access, Duration::hours(ttl_hours), secret)
}

/// Creates a short-lived token that only authorizes a password reset
pub fn create_reset_token(user_id: Uuid, role: Role, secret: &str) -> Result<String, String> {
    sign(
        user_id,
        role,
        TokenKind::Reset,
        Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        secret,
    )
}

fn sign(user_id: Uuid, role: Role, kind: TokenKind, ttl: Duration, secret: &str) -> Result<String, String> {
    let expiry = Utc::now() + ttl;
    let claims = Claims {
        sub: user_id,
        role,
        kind,
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token of the expected kind
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid, expired or of another kind
///
/// # Example
/// ```
/// use zeus_api::auth::jwt::{create_token, verify_token, TokenKind};
/// use zeus_api::domain::user::Role;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key";
/// let token = create_token(user_id, Role::Member, secret, 8).unwrap();
///
/// let claims = verify_token(&token, secret, TokenKind::Access).expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.kind != expected {
        return Err(format!("Expected {:?} token", expected));
    }

    Ok(claims)
}

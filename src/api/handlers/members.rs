use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::domain::user::validation::MemberPayload;
use crate::domain::user::{Gender, Role, User};
use crate::state::AppState;

/// A member as exposed by the API; the password hash never leaves the server
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub admission_date: NaiveDate,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for MemberResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number.clone(),
            gender: user.gender,
            photo_url: user.photo_url.clone(),
            admission_date: user.admission_date,
            skills: user.skills.clone(),
            is_active: user.is_active,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response from member creation, carrying the one-time password
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMemberResponse {
    #[serde(flatten)]
    pub member: MemberResponse,
    pub temporary_password: String,
}

/// GET /api/members
pub async fn list_members(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let users = state.members.list(&principal).await?;
    Ok(Json(users.iter().map(MemberResponse::from).collect()))
}

/// GET /api/members/:id
pub async fn get_member(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MemberResponse>, ApiError> {
    let Path(id) = path?;
    let user = state.members.get(&principal, id).await?;
    Ok(Json(MemberResponse::from(&user)))
}

/// POST /api/members
pub async fn create_member(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    body: Result<Json<MemberPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedMemberResponse>), ApiError> {
    let Json(payload) = body?;
    let provisioned = state.members.create(&principal, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMemberResponse {
            member: MemberResponse::from(&provisioned.user),
            temporary_password: provisioned.temporary_password,
        }),
    ))
}

/// PUT /api/members/:id
pub async fn update_member(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<MemberPayload>, JsonRejection>,
) -> Result<Json<MemberResponse>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = body?;
    let user = state.members.update(&principal, id, payload).await?;
    Ok(Json(MemberResponse::from(&user)))
}

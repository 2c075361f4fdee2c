use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::application::{BudgetView, UserSummary};
use crate::domain::budget::{BudgetPayload, BudgetStatus, ChangeRecord, Money};
use crate::domain::errors::DomainError;
use crate::domain::repositories::BudgetFilter;
use crate::domain::validation::add_violation;
use crate::state::AppState;

/// Query string accepted by the budget listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetQuery {
    pub status: Option<String>,
    pub responsible_id: Option<String>,
}

impl BudgetQuery {
    fn into_filter(self) -> Result<BudgetFilter, DomainError> {
        let mut errors = ValidationErrors::new();

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<BudgetStatus>() {
                Ok(status) => Some(status),
                Err(e) => {
                    add_violation(&mut errors, "status", "invalid", e);
                    None
                }
            },
        };

        let responsible_id = match self.responsible_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    add_violation(&mut errors, "responsibleId", "uuid", "responsibleId must be a valid UUID");
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(BudgetFilter {
            status,
            responsible_id,
            ..BudgetFilter::default()
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibleResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<UserSummary> for ResponsibleResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            full_name: summary.full_name,
            email: summary.email,
        }
    }
}

/// A budget with its responsible member and full audit trail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: Uuid,
    pub budget_number: String,
    pub project_description: String,
    pub client_name: String,
    pub responsible_id: Uuid,
    pub responsible: Option<ResponsibleResponse>,
    pub estimated_value: Money,
    pub expected_costs: Money,
    pub status: BudgetStatus,
    pub created_by: Uuid,
    pub history: Vec<ChangeRecord>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BudgetView> for BudgetResponse {
    fn from(view: BudgetView) -> Self {
        let budget = view.budget;
        Self {
            id: budget.id(),
            budget_number: budget.budget_number().as_str().to_string(),
            project_description: budget.project_description().to_string(),
            client_name: budget.client_name().to_string(),
            responsible_id: budget.responsible_id(),
            responsible: view.responsible.map(ResponsibleResponse::from),
            estimated_value: budget.estimated_value(),
            expected_costs: budget.expected_costs(),
            status: budget.status(),
            created_by: budget.created_by(),
            history: budget.history().to_vec(),
            version: budget.version(),
            created_at: budget.created_at(),
            updated_at: budget.updated_at(),
        }
    }
}

/// GET /api/budgets?status=&responsibleId=
pub async fn list_budgets(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    query: Result<Query<BudgetQuery>, QueryRejection>,
) -> Result<Json<Vec<BudgetResponse>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    let views = state.budgets.list(&principal, &filter).await?;
    Ok(Json(views.into_iter().map(BudgetResponse::from).collect()))
}

/// GET /api/budgets/:id
pub async fn get_budget(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let Path(id) = path?;
    let view = state.budgets.get(&principal, id).await?;
    Ok(Json(BudgetResponse::from(view)))
}

/// POST /api/budgets
pub async fn create_budget(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    body: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BudgetResponse>), ApiError> {
    let Json(payload) = body?;
    let view = state.budgets.create(&principal, payload).await?;

    Ok((StatusCode::CREATED, Json(BudgetResponse::from(view))))
}

/// PUT /api/budgets/:id
pub async fn update_budget(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BudgetPayload>, JsonRejection>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = body?;
    let view = state.budgets.update(&principal, id, payload).await?;

    Ok(Json(BudgetResponse::from(view)))
}

/// DELETE /api/budgets/:id
pub async fn delete_budget(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.budgets.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

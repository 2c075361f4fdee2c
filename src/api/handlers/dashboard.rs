use axum::{extract::State, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::JwtAuth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeManagementResponse {
    pub admin_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManagementResponse {
    pub total_estimated_value: Decimal,
    pub total_expected_costs: Decimal,
}

/// GET /api/dashboard/employee-management
pub async fn employee_management(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
) -> Result<Json<EmployeeManagementResponse>, ApiError> {
    let admin_count = state.dashboard.admin_count(&principal).await?;
    Ok(Json(EmployeeManagementResponse { admin_count }))
}

/// Totals for budgets created in the current calendar month
///
/// GET /api/dashboard/project-management
pub async fn project_management(
    State(state): State<AppState>,
    JwtAuth(principal): JwtAuth,
) -> Result<Json<ProjectManagementResponse>, ApiError> {
    let totals = state.dashboard.project_totals(&principal, Utc::now()).await?;

    Ok(Json(ProjectManagementResponse {
        total_estimated_value: totals.total_estimated_value,
        total_expected_costs: totals.total_expected_costs,
    }))
}

// Application layer: use cases invoked by the API handlers
// Each service runs authorization, validation and persistence explicitly

pub mod auth_service;
pub mod budget_service;
pub mod dashboard_service;
pub mod member_service;

use uuid::Uuid;

use crate::domain::user::User;

pub use auth_service::AuthService;
pub use budget_service::{BudgetService, BudgetView};
pub use dashboard_service::{DashboardService, ProjectTotals};
pub use member_service::{MemberService, ProvisionedMember};

/// Minimal identity of a user embedded in other resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.as_str().to_string(),
        }
    }
}

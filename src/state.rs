use sqlx::PgPool;
use std::sync::Arc;

use crate::application::budget_service::NumberSource;
use crate::application::{AuthService, BudgetService, DashboardService, MemberService};
use crate::config::AppConfig;
use crate::domain::repositories::{BudgetRepository, UserRepository};
use crate::infrastructure::repositories::{
    InMemoryBudgetRepository, InMemoryUserRepository, PostgresBudgetRepository,
    PostgresUserRepository,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub members: MemberService,
    pub budgets: BudgetService,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Wires the services over the given repositories
    pub fn from_repositories(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        budgets: Arc<dyn BudgetRepository>,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), config.jwt.clone()),
            members: MemberService::new(users.clone(), config.email_domain.clone()),
            budgets: BudgetService::new(budgets.clone(), users.clone()),
            dashboard: DashboardService::new(budgets, users),
            config,
        }
    }

    pub fn postgres(pool: PgPool, config: Arc<AppConfig>) -> Self {
        Self::from_repositories(
            config,
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresBudgetRepository::new(pool)),
        )
    }

    /// State backed by empty in-memory repositories
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self::from_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryBudgetRepository::new()),
        )
    }

    /// Replaces the budget number generator
    pub fn with_budget_numbers(mut self, numbers: NumberSource) -> Self {
        self.budgets = self.budgets.with_number_source(numbers);
        self
    }
}

// In-memory repositories for tests and local demos
// Mirror the constraints the PostgreSQL schema enforces

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::budget::{Budget, BudgetRevision};
use crate::domain::repositories::{
    BudgetFilter, BudgetRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::user::{Email, Role, User};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::UniqueViolation("users_pkey".to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
        }

        let stored = users.get_mut(&user.id).ok_or(RepositoryError::NotFound {
            entity: "User",
            id: user.id,
        })?;

        // Credentials only change through update_password
        let password_hash = std::mem::take(&mut stored.password_hash);
        let must_change_password = stored.must_change_password;
        *stored = User {
            password_hash,
            must_change_password,
            ..user.clone()
        };
        Ok(stored.clone())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> RepositoryResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound { entity: "User", id })?;

        user.password_hash = password_hash.to_string();
        user.must_change_password = must_change_password;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn count_by_role(&self, role: Role) -> RepositoryResult<i64> {
        let count = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .count();
        Ok(count as i64)
    }
}

struct StoredBudget {
    budget: Budget,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryBudgetRepository {
    budgets: RwLock<HashMap<Uuid, StoredBudget>>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows including soft-deleted ones
    pub async fn stored_count(&self) -> usize {
        self.budgets.read().await.len()
    }

    /// True when the row exists but is soft-deleted
    pub async fn is_deleted(&self, id: Uuid) -> bool {
        self.budgets
            .read()
            .await
            .get(&id)
            .is_some_and(|row| row.deleted_at.is_some())
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Budget>> {
        Ok(self
            .budgets
            .read()
            .await
            .get(&id)
            .filter(|row| row.deleted_at.is_none())
            .map(|row| row.budget.clone()))
    }

    async fn list(&self, filter: &BudgetFilter) -> RepositoryResult<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .budgets
            .read()
            .await
            .values()
            .filter(|row| row.deleted_at.is_none() && filter.matches(&row.budget))
            .map(|row| row.budget.clone())
            .collect();

        budgets.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(budgets)
    }

    async fn create(&self, budget: &Budget) -> RepositoryResult<Budget> {
        let mut budgets = self.budgets.write().await;
        if budgets.contains_key(&budget.id()) {
            return Err(RepositoryError::UniqueViolation("budgets_pkey".to_string()));
        }
        if budgets
            .values()
            .any(|row| row.budget.budget_number() == budget.budget_number())
        {
            return Err(RepositoryError::UniqueViolation(
                "budgets_budget_number_key".to_string(),
            ));
        }

        budgets.insert(
            budget.id(),
            StoredBudget {
                budget: budget.clone(),
                deleted_at: None,
            },
        );
        Ok(budget.clone())
    }

    async fn update(&self, revision: &BudgetRevision) -> RepositoryResult<Budget> {
        let id = revision.budget().id();
        let mut budgets = self.budgets.write().await;

        let row = budgets
            .get_mut(&id)
            .filter(|row| row.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound { entity: "Budget", id })?;

        if row.budget.version() != revision.expected_version() {
            return Err(RepositoryError::StaleVersion { entity: "Budget", id });
        }

        row.budget = revision
            .budget()
            .clone()
            .committed(revision.expected_version() + 1);
        Ok(row.budget.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut budgets = self.budgets.write().await;
        let row = budgets
            .get_mut(&id)
            .filter(|row| row.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound { entity: "Budget", id })?;

        row.deleted_at = Some(Utc::now());
        let version = row.budget.version() + 1;
        row.budget = row.budget.clone().committed(version);
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::budget::{Budget, BudgetRevision, BudgetStatus};

/// Criteria for listing budgets; `None` fields do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetFilter {
    pub status: Option<BudgetStatus>,
    pub responsible_id: Option<Uuid>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_until: Option<DateTime<Utc>>,
}

impl BudgetFilter {
    /// True when `budget` satisfies every criterion
    pub fn matches(&self, budget: &Budget) -> bool {
        self.status.map_or(true, |s| budget.status() == s)
            && self
                .responsible_id
                .map_or(true, |id| budget.responsible_id() == id)
            && self.created_from.map_or(true, |from| budget.created_at() >= from)
            && self
                .created_until
                .map_or(true, |until| budget.created_at() < until)
    }
}

/// Repository trait for the Budget aggregate
///
/// Soft-deleted budgets are invisible to every read. All writes touch a
/// single row in a single transaction.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Find a budget by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Budget>>;

    /// List budgets matching `filter`, newest first
    async fn list(&self, filter: &BudgetFilter) -> RepositoryResult<Vec<Budget>>;

    /// Insert a new budget
    ///
    /// A duplicate `budget_number` fails with `UniqueViolation`.
    async fn create(&self, budget: &Budget) -> RepositoryResult<Budget>;

    /// Commit a revision: merged fields plus appended history
    ///
    /// Fails with `StaleVersion` when the stored version no longer equals
    /// `revision.expected_version()`, and `NotFound` when the budget is gone.
    async fn update(&self, revision: &BudgetRevision) -> RepositoryResult<Budget>;

    /// Mark a budget deleted, keeping the row
    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()>;
}

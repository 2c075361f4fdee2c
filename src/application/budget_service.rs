use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::UserSummary;
use crate::domain::budget::{Budget, BudgetNumber, BudgetPayload};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::policy::{authorize, Operation, Principal, ResourceKind};
use crate::domain::repositories::{BudgetFilter, BudgetRepository, RepositoryError, UserRepository};

/// How many budget numbers are tried before giving up on a create
pub const MAX_NUMBER_ATTEMPTS: usize = 5;

/// Produces a candidate budget number for the given instant
pub type NumberSource = Arc<dyn Fn(DateTime<Utc>) -> BudgetNumber + Send + Sync>;

/// A budget together with the member responsible for it
///
/// `responsible` is `None` only if the user row vanished after the budget
/// was written.
#[derive(Debug, Clone)]
pub struct BudgetView {
    pub budget: Budget,
    pub responsible: Option<UserSummary>,
}

/// Budget use cases
///
/// Every operation runs the same pipeline: authorize, validate, read fresh
/// state, resolve references, diff, commit.
#[derive(Clone)]
pub struct BudgetService {
    budgets: Arc<dyn BudgetRepository>,
    users: Arc<dyn UserRepository>,
    numbers: NumberSource,
}

impl BudgetService {
    pub fn new(budgets: Arc<dyn BudgetRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            budgets,
            users,
            numbers: Arc::new(|at: DateTime<Utc>| BudgetNumber::generate(at, &mut rand::thread_rng())),
        }
    }

    /// Replaces the random budget number generator
    pub fn with_number_source(mut self, numbers: NumberSource) -> Self {
        self.numbers = numbers;
        self
    }

    pub async fn list(&self, principal: &Principal, filter: &BudgetFilter) -> DomainResult<Vec<BudgetView>> {
        authorize(principal, Operation::Read, ResourceKind::Budget).into_result()?;

        let budgets = self.budgets.list(filter).await?;

        let mut ids: Vec<Uuid> = budgets.iter().map(|b| b.responsible_id()).collect();
        ids.sort_unstable();
        ids.dedup();

        let responsible: HashMap<Uuid, UserSummary> = self
            .users
            .find_many(&ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let responsible = responsible.get(&budget.responsible_id()).cloned();
                BudgetView { budget, responsible }
            })
            .collect())
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> DomainResult<BudgetView> {
        authorize(principal, Operation::Read, ResourceKind::Budget).into_result()?;

        let budget = self.fetch(id).await?;
        self.view(budget).await
    }

    /// Creates a budget, retrying with a fresh number on collision
    pub async fn create(&self, principal: &Principal, payload: BudgetPayload) -> DomainResult<BudgetView> {
        authorize(principal, Operation::Create, ResourceKind::Budget).into_result()?;

        let draft = payload.into_draft()?;
        self.ensure_responsible(draft.responsible_id).await?;

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let now = Utc::now();
            let number = (self.numbers)(now);
            let budget = Budget::new(draft.clone(), principal.user_id, number, now);

            match self.budgets.create(&budget).await {
                Ok(created) => {
                    tracing::info!(
                        budget_id = %created.id(),
                        budget_number = %created.budget_number(),
                        created_by = %principal.user_id,
                        "Budget created"
                    );
                    return self.view(created).await;
                }
                Err(RepositoryError::UniqueViolation(constraint)) => {
                    tracing::warn!(
                        attempt,
                        budget_number = %budget.budget_number(),
                        %constraint,
                        "Budget number collision, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::Constraint(format!(
            "Could not allocate a unique budget number after {} attempts",
            MAX_NUMBER_ATTEMPTS
        )))
    }

    /// Applies a partial update and records one history entry per changed field
    ///
    /// A request that changes nothing returns the current budget without a
    /// write. A concurrent commit between our read and our write surfaces as
    /// [`DomainError::Conflict`].
    pub async fn update(&self, principal: &Principal, id: Uuid, payload: BudgetPayload) -> DomainResult<BudgetView> {
        authorize(principal, Operation::Update, ResourceKind::Budget).into_result()?;

        let changes = payload.into_changes()?;

        let current = self.fetch(id).await?;
        if let Some(responsible_id) = changes.responsible_id {
            self.ensure_responsible(responsible_id).await?;
        }

        let revision = current.apply_update(&changes, Utc::now());

        if revision.is_noop() {
            tracing::debug!(budget_id = %id, "Budget update changed nothing");
            return self.view(revision.into_budget()).await;
        }

        let updated = self.budgets.update(&revision).await?;

        tracing::info!(
            budget_id = %id,
            updated_by = %principal.user_id,
            changed_fields = revision.appended().len(),
            version = updated.version(),
            "Budget updated"
        );

        self.view(updated).await
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> DomainResult<()> {
        authorize(principal, Operation::Delete, ResourceKind::Budget).into_result()?;

        self.budgets.soft_delete(id).await?;

        tracing::info!(budget_id = %id, deleted_by = %principal.user_id, "Budget deleted");
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> DomainResult<Budget> {
        self.budgets
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Budget", id })
    }

    async fn ensure_responsible(&self, id: Uuid) -> DomainResult<()> {
        match self.users.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::ReferenceNotFound {
                field: "responsibleId",
                id,
            }),
        }
    }

    async fn view(&self, budget: Budget) -> DomainResult<BudgetView> {
        let responsible = self
            .users
            .find_by_id(budget.responsible_id())
            .await?
            .as_ref()
            .map(UserSummary::from);

        Ok(BudgetView { budget, responsible })
    }
}

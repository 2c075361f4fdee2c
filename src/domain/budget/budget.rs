use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::history::ChangeRecord;
use super::value_objects::{BudgetField, BudgetNumber, BudgetStatus, Money};

/// Validated fields for a new budget
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub project_description: String,
    pub client_name: String,
    pub responsible_id: Uuid,
    pub estimated_value: Money,
    pub expected_costs: Money,
    pub status: Option<BudgetStatus>,
}

/// Validated partial update of a budget
///
/// Only mutable fields exist here: `id`, `budget_number`, `created_by` and
/// `history` cannot be expressed as a change.
#[derive(Debug, Clone, Default)]
pub struct BudgetChanges {
    pub project_description: Option<String>,
    pub client_name: Option<String>,
    pub responsible_id: Option<Uuid>,
    pub estimated_value: Option<Money>,
    pub expected_costs: Option<Money>,
    pub status: Option<BudgetStatus>,
}

/// Budget aggregate root
///
/// A client project quote under review. Every mutation goes through
/// [`Budget::apply_update`], which records one [`ChangeRecord`] per changed
/// field.
///
/// # Invariants
/// - `history` only grows; existing records are never altered
/// - `id`, `budget_number` and `created_by` never change after creation
/// - Monetary fields are non-negative (enforced by [`Money`])
#[derive(Debug, Clone)]
pub struct Budget {
    id: Uuid,
    budget_number: BudgetNumber,
    project_description: String,
    client_name: String,
    responsible_id: Uuid,
    estimated_value: Money,
    expected_costs: Money,
    status: BudgetStatus,
    created_by: Uuid,
    history: Vec<ChangeRecord>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Outcome of applying changes to a budget, ready to be committed
///
/// Holds the merged state, the records appended by this update and the
/// version the budget had when it was read.
#[derive(Debug, Clone)]
pub struct BudgetRevision {
    budget: Budget,
    appended: Vec<ChangeRecord>,
    expected_version: i64,
}

impl BudgetRevision {
    /// True when no field differed; nothing needs to be written
    pub fn is_noop(&self) -> bool {
        self.appended.is_empty()
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn appended(&self) -> &[ChangeRecord] {
        &self.appended
    }

    pub fn expected_version(&self) -> i64 {
        self.expected_version
    }

    pub fn into_budget(self) -> Budget {
        self.budget
    }
}

impl Budget {
    /// Creates a new Budget
    ///
    /// Status defaults to `under_review` and history starts empty.
    ///
    /// # Example
    /// ```
    /// use chrono::Utc;
    /// use serde_json::json;
    /// use uuid::Uuid;
    /// use zeus_api::domain::budget::{Budget, BudgetDraft, BudgetNumber, BudgetStatus, Money};
    ///
    /// let draft = BudgetDraft {
    ///     project_description: "Landing page".to_string(),
    ///     client_name: "ACME".to_string(),
    ///     responsible_id: Uuid::new_v4(),
    ///     estimated_value: Money::from_json(&json!(1000)).unwrap(),
    ///     expected_costs: Money::from_json(&json!(250)).unwrap(),
    ///     status: None,
    /// };
    /// let number = BudgetNumber::parse("ORC2025040001").unwrap();
    /// let budget = Budget::new(draft, Uuid::new_v4(), number, Utc::now());
    ///
    /// assert_eq!(budget.status(), BudgetStatus::UnderReview);
    /// assert!(budget.history().is_empty());
    /// ```
    pub fn new(draft: BudgetDraft, created_by: Uuid, number: BudgetNumber, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            budget_number: number,
            project_description: draft.project_description,
            client_name: draft.client_name,
            responsible_id: draft.responsible_id,
            estimated_value: draft.estimated_value,
            expected_costs: draft.expected_costs,
            status: draft.status.unwrap_or_default(),
            created_by,
            history: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Computes the field-level diff between this state and `changes`
    ///
    /// Fields are compared by value in [`BudgetField::ORDER`]; each differing
    /// field yields one change record stamped with `now` and appended after
    /// the existing history. When nothing differs the revision is a no-op and
    /// the budget is returned untouched.
    pub fn apply_update(&self, changes: &BudgetChanges, now: DateTime<Utc>) -> BudgetRevision {
        let mut next = self.clone();
        let mut appended = Vec::new();

        for field in BudgetField::ORDER {
            let log = &mut appended;
            match field {
                BudgetField::ProjectDescription => track(
                    field,
                    &mut next.project_description,
                    changes.project_description.as_ref(),
                    now,
                    log,
                ),
                BudgetField::ClientName => {
                    track(field, &mut next.client_name, changes.client_name.as_ref(), now, log)
                }
                BudgetField::ResponsibleId => track(
                    field,
                    &mut next.responsible_id,
                    changes.responsible_id.as_ref(),
                    now,
                    log,
                ),
                BudgetField::EstimatedValue => track(
                    field,
                    &mut next.estimated_value,
                    changes.estimated_value.as_ref(),
                    now,
                    log,
                ),
                BudgetField::ExpectedCosts => track(
                    field,
                    &mut next.expected_costs,
                    changes.expected_costs.as_ref(),
                    now,
                    log,
                ),
                BudgetField::Status => track(field, &mut next.status, changes.status.as_ref(), now, log),
            }
        }

        if !appended.is_empty() {
            next.history.extend(appended.iter().cloned());
            next.updated_at = now;
        }

        BudgetRevision {
            budget: next,
            appended,
            expected_version: self.version,
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn budget_number(&self) -> &BudgetNumber {
        &self.budget_number
    }

    pub fn project_description(&self) -> &str {
        &self.project_description
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn responsible_id(&self) -> Uuid {
        self.responsible_id
    }

    pub fn estimated_value(&self) -> Money {
        self.estimated_value
    }

    pub fn expected_costs(&self) -> Money {
        self.expected_costs
    }

    pub fn status(&self) -> BudgetStatus {
        self.status
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    /// Full audit trail, oldest first
    pub fn history(&self) -> &[ChangeRecord] {
        &self.history
    }

    /// Optimistic concurrency counter, bumped by the store on every commit
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Budget from persistence layer data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        budget_number: BudgetNumber,
        project_description: String,
        client_name: String,
        responsible_id: Uuid,
        estimated_value: Money,
        expected_costs: Money,
        status: BudgetStatus,
        created_by: Uuid,
        history: Vec<ChangeRecord>,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            budget_number,
            project_description,
            client_name,
            responsible_id,
            estimated_value,
            expected_costs,
            status,
            created_by,
            history,
            version,
            created_at,
            updated_at,
        }
    }

    /// Copy of this budget carrying the version assigned by a commit
    pub fn committed(mut self, version: i64) -> Self {
        self.version = version;
        self
    }
}

fn track<T>(
    field: BudgetField,
    slot: &mut T,
    proposed: Option<&T>,
    at: DateTime<Utc>,
    log: &mut Vec<ChangeRecord>,
) where
    T: PartialEq + Clone + Serialize,
{
    let Some(value) = proposed else {
        return;
    };
    if *slot == *value {
        return;
    }

    log.push(ChangeRecord::new(field, json!(slot), json!(value), at));
    *slot = value.clone();
}

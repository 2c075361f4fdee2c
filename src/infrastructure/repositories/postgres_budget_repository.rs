use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::map_db_error;
use crate::domain::budget::{Budget, BudgetNumber, BudgetRevision, BudgetStatus, ChangeRecord, Money};
use crate::domain::repositories::{BudgetFilter, BudgetRepository, RepositoryError, RepositoryResult};

const BUDGET_COLUMNS: &str = "id, budget_number, project_description, client_name, \
     responsible_id, estimated_value, expected_costs, status, created_by, history, \
     version, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    budget_number: String,
    project_description: String,
    client_name: String,
    responsible_id: Uuid,
    estimated_value: Decimal,
    expected_costs: Decimal,
    status: BudgetStatus,
    created_by: Uuid,
    history: Json<Vec<ChangeRecord>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = RepositoryError;

    fn try_from(r: BudgetRow) -> Result<Self, Self::Error> {
        let number = BudgetNumber::parse(&r.budget_number)
            .map_err(|e| RepositoryError::Database(format!("Invalid budget number from database: {}", e)))?;

        Ok(Budget::from_persistence(
            r.id,
            number,
            r.project_description,
            r.client_name,
            r.responsible_id,
            Money::from_persistence(r.estimated_value),
            Money::from_persistence(r.expected_costs),
            r.status,
            r.created_by,
            r.history.0,
            r.version,
            r.created_at,
            r.updated_at,
        ))
    }
}

/// PostgreSQL implementation of BudgetRepository
///
/// History lives in a JSONB array. Updates append to it in SQL and bump the
/// `version` column only when the caller's expected version still matches.
pub struct PostgresBudgetRepository {
    pool: PgPool,
}

impl PostgresBudgetRepository {
    /// Creates a new PostgresBudgetRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetRepository for PostgresBudgetRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Budget>> {
        let sql = format!(
            "SELECT {} FROM budgets WHERE id = $1 AND deleted_at IS NULL",
            BUDGET_COLUMNS
        );

        sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find budget by id"))?
            .map(Budget::try_from)
            .transpose()
    }

    async fn list(&self, filter: &BudgetFilter) -> RepositoryResult<Vec<Budget>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM budgets
            WHERE deleted_at IS NULL
              AND ($1::budget_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR responsible_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            ORDER BY created_at DESC
            "#,
            BUDGET_COLUMNS
        );

        sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(filter.status)
            .bind(filter.responsible_id)
            .bind(filter.created_from)
            .bind(filter.created_until)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to list budgets"))?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    async fn create(&self, budget: &Budget) -> RepositoryResult<Budget> {
        let sql = format!(
            r#"
            INSERT INTO budgets (
                id, budget_number, project_description, client_name,
                responsible_id, estimated_value, expected_costs, status,
                created_by, history, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            BUDGET_COLUMNS
        );

        let row = sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(budget.id())
            .bind(budget.budget_number().as_str())
            .bind(budget.project_description())
            .bind(budget.client_name())
            .bind(budget.responsible_id())
            .bind(budget.estimated_value().amount())
            .bind(budget.expected_costs().amount())
            .bind(budget.status())
            .bind(budget.created_by())
            .bind(Json(budget.history()))
            .bind(budget.version())
            .bind(budget.created_at())
            .bind(budget.updated_at())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to create budget"))?;

        Budget::try_from(row)
    }

    async fn update(&self, revision: &BudgetRevision) -> RepositoryResult<Budget> {
        let budget = revision.budget();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Failed to begin transaction"))?;

        let sql = format!(
            r#"
            UPDATE budgets
            SET project_description = $3,
                client_name = $4,
                responsible_id = $5,
                estimated_value = $6,
                expected_costs = $7,
                status = $8,
                history = history || $9::jsonb,
                version = version + 1,
                updated_at = $10
            WHERE id = $1 AND version = $2 AND deleted_at IS NULL
            RETURNING {}
            "#,
            BUDGET_COLUMNS
        );

        let row = sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(budget.id())
            .bind(revision.expected_version())
            .bind(budget.project_description())
            .bind(budget.client_name())
            .bind(budget.responsible_id())
            .bind(budget.estimated_value().amount())
            .bind(budget.expected_costs().amount())
            .bind(budget.status())
            .bind(Json(revision.appended()))
            .bind(budget.updated_at())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to update budget"))?;

        let Some(row) = row else {
            let exists: Option<i64> = sqlx::query_scalar(
                "SELECT version FROM budgets WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(budget.id())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to check budget version"))?;

            tx.rollback()
                .await
                .map_err(|e| map_db_error(e, "Failed to roll back transaction"))?;

            return Err(match exists {
                Some(_) => RepositoryError::StaleVersion {
                    entity: "Budget",
                    id: budget.id(),
                },
                None => RepositoryError::NotFound {
                    entity: "Budget",
                    id: budget.id(),
                },
            });
        };

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Failed to commit transaction"))?;

        Budget::try_from(row)
    }

    async fn soft_delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET deleted_at = NOW(), version = version + 1
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to delete budget"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "Budget", id });
        }
        Ok(())
    }
}

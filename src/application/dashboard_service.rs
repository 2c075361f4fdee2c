use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::policy::{authorize, Operation, Principal, ResourceKind};
use crate::domain::repositories::{BudgetFilter, BudgetRepository, UserRepository};
use crate::domain::user::Role;

/// Money totals over the budgets created in one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTotals {
    pub total_estimated_value: Decimal,
    pub total_expected_costs: Decimal,
}

#[derive(Clone)]
pub struct DashboardService {
    budgets: Arc<dyn BudgetRepository>,
    users: Arc<dyn UserRepository>,
}

impl DashboardService {
    pub fn new(budgets: Arc<dyn BudgetRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { budgets, users }
    }

    /// Number of users holding the admin role
    pub async fn admin_count(&self, principal: &Principal) -> DomainResult<i64> {
        authorize(principal, Operation::Read, ResourceKind::Dashboard).into_result()?;
        Ok(self.users.count_by_role(Role::Admin).await?)
    }

    /// Sums estimated values and expected costs of budgets created in the month containing `now`
    pub async fn project_totals(&self, principal: &Principal, now: DateTime<Utc>) -> DomainResult<ProjectTotals> {
        authorize(principal, Operation::Read, ResourceKind::Dashboard).into_result()?;

        let (from, until) = month_window(now)?;
        let filter = BudgetFilter {
            created_from: Some(from),
            created_until: Some(until),
            ..BudgetFilter::default()
        };

        let budgets = self.budgets.list(&filter).await?;

        let mut total_estimated_value: Decimal = budgets.iter().map(|b| b.estimated_value().amount()).sum();
        let mut total_expected_costs: Decimal = budgets.iter().map(|b| b.expected_costs().amount()).sum();
        total_estimated_value.rescale(2);
        total_expected_costs.rescale(2);

        Ok(ProjectTotals {
            total_estimated_value,
            total_expected_costs,
        })
    }
}

/// First instant of the month containing `now` and first instant of the next
fn month_window(now: DateTime<Utc>) -> DomainResult<(DateTime<Utc>, DateTime<Utc>)> {
    let (year, month) = (now.year(), now.month());
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    let start = month_start(year, month)?;
    let end = month_start(next_year, next_month)?;
    Ok((start, end))
}

fn month_start(year: i32, month: u32) -> DomainResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DomainError::Unknown(format!("Invalid month {}-{}", year, month)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_the_calendar_month() {
        let now = Utc.with_ymd_and_hms(2025, 4, 17, 15, 30, 0).unwrap();
        let (from, until) = month_window(now).unwrap();

        assert_eq!(from, Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let (from, until) = month_window(now).unwrap();

        assert_eq!(from, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }
}

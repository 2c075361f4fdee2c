use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Review status of a budget
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "budget_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Waiting for a decision
    #[default]
    UnderReview,
    /// Accepted by the client
    Approved,
    /// Declined
    Rejected,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::UnderReview => "under_review",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for BudgetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "under_review" => Ok(BudgetStatus::UnderReview),
            "approved" => Ok(BudgetStatus::Approved),
            "rejected" => Ok(BudgetStatus::Rejected),
            other => Err(format!(
                "Invalid status '{}': expected under_review, approved or rejected",
                other
            )),
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative monetary amount with exactly two fractional digits
///
/// # Invariants
/// - Never negative
/// - Scale is always 2 (`1000` is stored as `1000.00`)
/// - Fits the `NUMERIC(10, 2)` column
///
/// Equality compares values, so amounts parsed from `1000` and `"1000.00"`
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value, rounding half away from zero to two places
    ///
    /// # Example
    /// ```
    /// use rust_decimal::Decimal;
    /// use zeus_api::domain::budget::Money;
    ///
    /// let money = Money::new(Decimal::new(12005, 1)).expect("valid amount");
    /// assert_eq!(money.to_string(), "1200.50");
    /// ```
    pub fn new(amount: Decimal) -> Result<Self, String> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err("amount cannot be negative".to_string());
        }

        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Self::max() {
            return Err(format!("amount cannot exceed {}", Self::max()));
        }
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(2);

        Ok(Money(rounded))
    }

    /// Coerces a JSON number or numeric string into Money
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let amount = match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
        .ok_or_else(|| "must be a number".to_string())?;

        Self::new(amount)
    }

    /// Largest amount a `NUMERIC(10, 2)` column holds
    pub fn max() -> Decimal {
        Decimal::new(9_999_999_999, 2)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Reconstructs Money from a stored column value
    pub fn from_persistence(amount: Decimal) -> Self {
        let mut amount = amount;
        amount.rescale(2);
        Money(amount)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable budget identifier
///
/// Format: `ORC` + four-digit year + two-digit month + four random digits,
/// e.g. `ORC2025040042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BudgetNumber(String);

impl BudgetNumber {
    pub const PREFIX: &'static str = "ORC";

    /// Generates a number for the month of `at` with a random suffix
    pub fn generate<R: Rng + ?Sized>(at: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: u16 = rng.gen_range(0..10_000);
        BudgetNumber(format!("{}{}{:04}", Self::PREFIX, at.format("%Y%m"), suffix))
    }

    /// Parses and checks the number format
    pub fn parse(raw: &str) -> Result<Self, String> {
        let digits = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| format!("Budget number must start with {}", Self::PREFIX))?;

        if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid budget number: {}", raw));
        }

        let month: u32 = digits[4..6]
            .parse()
            .map_err(|_| format!("Invalid budget number: {}", raw))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month in budget number: {}", raw));
        }

        Ok(BudgetNumber(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BudgetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable budget fields in the order changes are evaluated and recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetField {
    ProjectDescription,
    ClientName,
    ResponsibleId,
    EstimatedValue,
    ExpectedCosts,
    Status,
}

impl BudgetField {
    pub const ORDER: [BudgetField; 6] = [
        BudgetField::ProjectDescription,
        BudgetField::ClientName,
        BudgetField::ResponsibleId,
        BudgetField::EstimatedValue,
        BudgetField::ExpectedCosts,
        BudgetField::Status,
    ];

    /// Field name as it appears in request bodies and change records
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetField::ProjectDescription => "projectDescription",
            BudgetField::ClientName => "clientName",
            BudgetField::ResponsibleId => "responsibleId",
            BudgetField::EstimatedValue => "estimatedValue",
            BudgetField::ExpectedCosts => "expectedCosts",
            BudgetField::Status => "status",
        }
    }
}

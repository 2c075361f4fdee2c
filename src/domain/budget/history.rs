use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value_objects::BudgetField;

/// One field-level change in a budget's audit trail
///
/// Serialized as `{ field, oldValue, newValue, changedAt }` both in API
/// responses and in the `history` JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
    pub changed_at: DateTime<Utc>,
}

impl ChangeRecord {
    pub fn new(field: BudgetField, old_value: Value, new_value: Value, changed_at: DateTime<Utc>) -> Self {
        Self {
            field: field.as_str().to_string(),
            old_value,
            new_value,
            changed_at,
        }
    }
}

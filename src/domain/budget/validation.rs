use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::ValidationErrors;

use super::budget::{BudgetChanges, BudgetDraft};
use super::value_objects::{BudgetStatus, Money};
use crate::domain::validation::{add_violation, text};

/// Budget request body as received from clients
///
/// Every field stays raw JSON; a wrongly typed value is a field violation,
/// never a decoding failure. Monetary fields accept both `1200.5` and
/// `"1200.50"`. Keys that are not listed here (`id`, `createdBy`,
/// `budgetNumber`, `history`, ...) are dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPayload {
    pub project_description: Option<Value>,
    pub client_name: Option<Value>,
    pub responsible_id: Option<Value>,
    pub estimated_value: Option<Value>,
    pub expected_costs: Option<Value>,
    pub status: Option<Value>,
}

impl BudgetPayload {
    /// Validates a creation request
    ///
    /// Every field except `status` is required. All violations are returned
    /// together.
    pub fn into_draft(self) -> Result<BudgetDraft, ValidationErrors> {
        let (errors, changes) = self.check(true);
        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            changes.project_description,
            changes.client_name,
            changes.responsible_id,
            changes.estimated_value,
            changes.expected_costs,
        ) {
            (
                Some(project_description),
                Some(client_name),
                Some(responsible_id),
                Some(estimated_value),
                Some(expected_costs),
            ) => Ok(BudgetDraft {
                project_description,
                client_name,
                responsible_id,
                estimated_value,
                expected_costs,
                status: changes.status,
            }),
            _ => Err(errors),
        }
    }

    /// Validates a partial update; absent fields are not checked
    pub fn into_changes(self) -> Result<BudgetChanges, ValidationErrors> {
        let (errors, changes) = self.check(false);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    fn check(self, required: bool) -> (ValidationErrors, BudgetChanges) {
        let mut errors = ValidationErrors::new();

        let project_description = text(
            &mut errors,
            "projectDescription",
            self.project_description,
            required,
        );
        let client_name = text(&mut errors, "clientName", self.client_name, required);

        let responsible_id = text(&mut errors, "responsibleId", self.responsible_id, required)
            .and_then(|raw| match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    add_violation(
                        &mut errors,
                        "responsibleId",
                        "uuid",
                        "responsibleId must be a valid identifier",
                    );
                    None
                }
            });

        let estimated_value = money(&mut errors, "estimatedValue", self.estimated_value, required);
        let expected_costs = money(&mut errors, "expectedCosts", self.expected_costs, required);

        let status = text(&mut errors, "status", self.status, false).and_then(|raw| {
            match raw.parse::<BudgetStatus>() {
                Ok(status) => Some(status),
                Err(message) => {
                    add_violation(&mut errors, "status", "enum", message);
                    None
                }
            }
        });

        let changes = BudgetChanges {
            project_description,
            client_name,
            responsible_id,
            estimated_value,
            expected_costs,
            status,
        };

        (errors, changes)
    }
}

fn money(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<Value>,
    required: bool,
) -> Option<Money> {
    match value {
        Some(raw) => match Money::from_json(&raw) {
            Ok(money) => Some(money),
            Err(reason) => {
                add_violation(errors, field, "amount", format!("{} {}", field, reason));
                None
            }
        },
        None => {
            if required {
                add_violation(errors, field, "required", format!("{} is required", field));
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> BudgetPayload {
        serde_json::from_value(value).expect("payload deserializes")
    }

    #[test]
    fn valid_creation_payload() {
        let responsible = Uuid::new_v4();
        let draft = payload(json!({
            "projectDescription": "  E-commerce  ",
            "clientName": "Loja do Zé",
            "responsibleId": responsible.to_string(),
            "estimatedValue": 1000,
            "expectedCosts": "250.5"
        }))
        .into_draft()
        .expect("valid draft");

        assert_eq!(draft.project_description, "E-commerce");
        assert_eq!(draft.responsible_id, responsible);
        assert_eq!(draft.estimated_value.to_string(), "1000.00");
        assert_eq!(draft.expected_costs.to_string(), "250.50");
        assert!(draft.status.is_none());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let errors = payload(json!({
            "projectDescription": "Website",
            "clientName": "",
            "responsibleId": Uuid::new_v4().to_string(),
            "estimatedValue": -5,
            "expectedCosts": 10,
            "status": "bogus"
        }))
        .into_draft()
        .unwrap_err();

        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("estimatedValue"));
        assert!(fields.contains_key("clientName"));
        assert!(fields.contains_key("status"));
    }

    #[test]
    fn wrong_json_types_are_reported_with_other_violations() {
        let errors = payload(json!({
            "projectDescription": ["not", "text"],
            "clientName": 5,
            "responsibleId": 42,
            "estimatedValue": -5,
            "expectedCosts": 10,
            "status": "bogus"
        }))
        .into_draft()
        .unwrap_err();

        let fields = errors.field_errors();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["clientName"][0].code, "type");
        assert_eq!(fields["projectDescription"][0].code, "type");
        assert_eq!(fields["responsibleId"][0].code, "type");
        assert!(fields.contains_key("estimatedValue"));
        assert!(fields.contains_key("status"));
    }

    #[test]
    fn null_fields_count_as_missing() {
        let changes = payload(json!({ "clientName": null, "status": "approved" }))
            .into_changes()
            .expect("null is treated as absent");

        assert!(changes.client_name.is_none());
    }

    #[test]
    fn missing_fields_are_required_on_creation() {
        let errors = BudgetPayload::default().into_draft().unwrap_err();
        let fields = errors.field_errors();

        assert_eq!(fields.len(), 5);
        assert!(!fields.contains_key("status"));
    }

    #[test]
    fn malformed_responsible_id_is_a_validation_error() {
        let errors = payload(json!({ "responsibleId": "not-a-uuid" }))
            .into_changes()
            .unwrap_err();

        assert!(errors.field_errors().contains_key("responsibleId"));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let errors = payload(json!({ "expectedCosts": "lots" }))
            .into_changes()
            .unwrap_err();

        assert!(errors.field_errors().contains_key("expectedCosts"));
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let changes = payload(json!({ "status": "approved" }))
            .into_changes()
            .expect("valid changes");

        assert_eq!(changes.status, Some(BudgetStatus::Approved));
        assert!(changes.client_name.is_none());
        assert!(changes.estimated_value.is_none());
    }

    #[test]
    fn present_but_blank_field_fails_on_update() {
        let errors = payload(json!({ "projectDescription": "   " }))
            .into_changes()
            .unwrap_err();

        assert!(errors.field_errors().contains_key("projectDescription"));
    }

    #[test]
    fn protected_keys_are_ignored() {
        let changes = payload(json!({
            "createdBy": Uuid::new_v4().to_string(),
            "id": Uuid::new_v4().to_string(),
            "history": [],
            "budgetNumber": "ORC2025010001"
        }))
        .into_changes()
        .expect("unknown keys are dropped");

        assert!(changes.project_description.is_none());
        assert!(changes.status.is_none());
    }
}

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use validator::ValidationErrors;

use super::value_objects::{normalize_skills, Email, Gender, Role};
use crate::domain::validation::{add_violation, text};

/// Member request body as received from clients
///
/// Fields stay raw JSON so a wrongly typed value becomes a field violation
/// instead of rejecting the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub full_name: Option<Value>,
    pub email: Option<Value>,
    pub date_of_birth: Option<Value>,
    pub role: Option<Value>,
    pub admission_date: Option<Value>,
    pub skills: Option<Value>,
    pub phone_number: Option<Value>,
    pub gender: Option<Value>,
    pub photo_url: Option<Value>,
}

impl MemberPayload {
    /// True when the raw body asks for a role other than `role`
    ///
    /// Read before validation, so a value of the wrong JSON type counts as
    /// a request for another role.
    pub fn requests_role_other_than(&self, role: Role) -> bool {
        match &self.role {
            None | Some(Value::Null) => false,
            Some(Value::String(raw)) => {
                let raw = raw.trim();
                !raw.is_empty() && raw != role.as_str()
            }
            Some(_) => true,
        }
    }
}

/// Skills arrive either as a JSON array of strings or as a comma-separated string
fn skills(errors: &mut ValidationErrors, value: Option<Value>) -> Option<Vec<String>> {
    match value? {
        Value::String(raw) => Some(normalize_skills(raw.split(','))),
        Value::Array(items) => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(name) => names.push(name),
                    _ => {
                        add_violation(errors, "skills", "type", "skills must contain only strings");
                        return None;
                    }
                }
            }
            Some(normalize_skills(names))
        }
        _ => {
            add_violation(
                errors,
                "skills",
                "type",
                "skills must be an array or a comma-separated string",
            );
            None
        }
    }
}

/// Context the member rules depend on
#[derive(Debug, Clone, Copy)]
pub struct MemberRules<'a> {
    pub email_domain: &'a str,
    pub today: NaiveDate,
}

/// Validated input for member provisioning
#[derive(Debug, Clone)]
pub struct NewMember {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Email,
    pub role: Role,
    pub phone_number: String,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub admission_date: NaiveDate,
    pub skills: Vec<String>,
}

/// Validated partial update of a member
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<Email>,
    pub role: Option<Role>,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub photo_url: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub skills: Option<Vec<String>>,
}

impl MemberPayload {
    /// Validates a provisioning request; name, email and both dates are required
    pub fn into_new_member(self, rules: &MemberRules<'_>) -> Result<NewMember, ValidationErrors> {
        let (errors, changes) = self.check(rules, true);
        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            changes.full_name,
            changes.email,
            changes.date_of_birth,
            changes.admission_date,
        ) {
            (Some(full_name), Some(email), Some(date_of_birth), Some(admission_date)) => {
                Ok(NewMember {
                    full_name,
                    date_of_birth,
                    email,
                    role: changes.role.unwrap_or_default(),
                    phone_number: changes.phone_number.unwrap_or_default(),
                    gender: changes.gender.unwrap_or_default(),
                    photo_url: changes.photo_url,
                    admission_date,
                    skills: changes.skills.unwrap_or_default(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Validates a partial update; absent fields are left untouched
    pub fn into_changes(self, rules: &MemberRules<'_>) -> Result<MemberChanges, ValidationErrors> {
        let (errors, changes) = self.check(rules, false);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    fn check(self, rules: &MemberRules<'_>, required: bool) -> (ValidationErrors, MemberChanges) {
        let mut errors = ValidationErrors::new();

        let full_name = text(&mut errors, "fullName", self.full_name, required);

        let email = match text(&mut errors, "email", self.email, required) {
            Some(raw) => match Email::institutional(raw, rules.email_domain) {
                Ok(email) => Some(email),
                Err(message) => {
                    add_violation(&mut errors, "email", "email", message);
                    None
                }
            },
            None => None,
        };

        let date_of_birth = parse_date(&mut errors, "dateOfBirth", self.date_of_birth, required)
            .and_then(|date| {
                if date < rules.today {
                    Some(date)
                } else {
                    add_violation(
                        &mut errors,
                        "dateOfBirth",
                        "range",
                        "dateOfBirth must be before today",
                    );
                    None
                }
            });

        let admission_date =
            parse_date(&mut errors, "admissionDate", self.admission_date, required).and_then(
                |date| {
                    if date <= rules.today {
                        Some(date)
                    } else {
                        add_violation(
                            &mut errors,
                            "admissionDate",
                            "range",
                            "admissionDate must not be in the future",
                        );
                        None
                    }
                },
            );

        let role = text(&mut errors, "role", self.role, false)
            .and_then(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(message) => {
                    add_violation(&mut errors, "role", "enum", message);
                    None
                }
            });

        let gender = text(&mut errors, "gender", self.gender, false)
            .and_then(|raw| match raw.parse::<Gender>() {
                Ok(gender) => Some(gender),
                Err(message) => {
                    add_violation(&mut errors, "gender", "enum", message);
                    None
                }
            });

        let phone_number = optional_text(&mut errors, "phoneNumber", self.phone_number);
        let photo_url =
            optional_text(&mut errors, "photoUrl", self.photo_url).filter(|p| !p.is_empty());
        let skills = skills(&mut errors, self.skills);

        let changes = MemberChanges {
            full_name,
            date_of_birth,
            email,
            role,
            phone_number,
            gender,
            photo_url,
            admission_date,
            skills,
        };

        (errors, changes)
    }
}

/// Free text that may be blank; only the JSON type is checked
fn optional_text(errors: &mut ValidationErrors, field: &'static str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(raw) => Some(raw.trim().to_string()),
        _ => {
            add_violation(errors, field, "type", format!("{} must be a string", field));
            None
        }
    }
}

fn parse_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<Value>,
    required: bool,
) -> Option<NaiveDate> {
    let raw = text(errors, field, value, required)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            add_violation(
                errors,
                field,
                "date",
                format!("{} must be a date in YYYY-MM-DD format", field),
            );
            None
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::validation::{MemberChanges, NewMember};
use super::value_objects::{Email, Gender, Role};

/// A person with system access
///
/// `password_hash` always holds a bcrypt hash; cleartext passwords only exist
/// transiently in request handling.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub phone_number: String,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub admission_date: NaiveDate,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a freshly provisioned member
    ///
    /// The member must rotate `password_hash` (a temporary password) on first
    /// login.
    pub fn provision(member: NewMember, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: member.full_name,
            date_of_birth: member.date_of_birth,
            email: member.email,
            password_hash,
            role: member.role,
            phone_number: member.phone_number,
            gender: member.gender,
            photo_url: member.photo_url,
            admission_date: member.admission_date,
            skills: member.skills,
            is_active: true,
            must_change_password: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies validated changes, returning whether anything differed
    pub fn apply_changes(&mut self, changes: MemberChanges, now: DateTime<Utc>) -> bool {
        let before = (
            self.full_name.clone(),
            self.date_of_birth,
            self.email.clone(),
            self.role,
            self.phone_number.clone(),
            self.gender,
            self.photo_url.clone(),
            self.admission_date,
            self.skills.clone(),
        );

        if let Some(v) = changes.full_name {
            self.full_name = v;
        }
        if let Some(v) = changes.date_of_birth {
            self.date_of_birth = v;
        }
        if let Some(v) = changes.email {
            self.email = v;
        }
        if let Some(v) = changes.role {
            self.role = v;
        }
        if let Some(v) = changes.phone_number {
            self.phone_number = v;
        }
        if let Some(v) = changes.gender {
            self.gender = v;
        }
        if let Some(v) = changes.photo_url {
            self.photo_url = Some(v);
        }
        if let Some(v) = changes.admission_date {
            self.admission_date = v;
        }
        if let Some(v) = changes.skills {
            self.skills = v;
        }

        let after = (
            self.full_name.clone(),
            self.date_of_birth,
            self.email.clone(),
            self.role,
            self.phone_number.clone(),
            self.gender,
            self.photo_url.clone(),
            self.admission_date,
            self.skills.clone(),
        );

        let changed = before != after;
        if changed {
            self.updated_at = now;
        }
        changed
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

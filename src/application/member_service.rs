use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::{generate_temporary_password, hash_password_async};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::policy::{authorize, Operation, Principal, ResourceKind};
use crate::domain::repositories::UserRepository;
use crate::domain::user::validation::{MemberPayload, MemberRules};
use crate::domain::user::{Email, Role, User};

/// A member that was just provisioned, with the only copy of its password
#[derive(Debug, Clone)]
pub struct ProvisionedMember {
    pub user: User,
    pub temporary_password: String,
}

#[derive(Clone)]
pub struct MemberService {
    users: Arc<dyn UserRepository>,
    email_domain: String,
}

impl MemberService {
    pub fn new(users: Arc<dyn UserRepository>, email_domain: impl Into<String>) -> Self {
        Self {
            users,
            email_domain: email_domain.into(),
        }
    }

    pub async fn list(&self, principal: &Principal) -> DomainResult<Vec<User>> {
        authorize(principal, Operation::Read, ResourceKind::Member).into_result()?;
        Ok(self.users.list().await?)
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> DomainResult<User> {
        authorize(principal, Operation::Read, ResourceKind::Member).into_result()?;
        self.fetch(id).await
    }

    /// Provisions a member with a random temporary password
    ///
    /// The cleartext password is returned once and never stored; the member
    /// must change it on first login.
    pub async fn create(&self, principal: &Principal, payload: MemberPayload) -> DomainResult<ProvisionedMember> {
        authorize(principal, Operation::Create, ResourceKind::Member).into_result()?;
        if payload.requests_role_other_than(Role::Member) {
            authorize(principal, Operation::AssignRole, ResourceKind::Member).into_result()?;
        }

        let today = Utc::now().date_naive();
        let member = payload.into_new_member(&self.rules(today))?;
        self.ensure_email_free(&member.email, None).await?;

        let temporary_password = generate_temporary_password();
        let password_hash = hash_password_async(temporary_password.clone())
            .await
            .map_err(DomainError::Unknown)?;

        let user = self
            .users
            .create(&User::provision(member, password_hash, Utc::now()))
            .await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            created_by = %principal.user_id,
            "Member provisioned"
        );

        Ok(ProvisionedMember {
            user,
            temporary_password,
        })
    }

    /// Applies a partial profile update; role changes need the admin role
    pub async fn update(&self, principal: &Principal, id: Uuid, payload: MemberPayload) -> DomainResult<User> {
        authorize(principal, Operation::Update, ResourceKind::Member).into_result()?;
        if payload.requests_role_other_than(Role::Member) {
            authorize(principal, Operation::AssignRole, ResourceKind::Member).into_result()?;
        }

        let today = Utc::now().date_naive();
        let changes = payload.into_changes(&self.rules(today))?;

        let mut user = self.fetch(id).await?;

        if changes.role.is_some_and(|role| role != user.role) {
            authorize(principal, Operation::AssignRole, ResourceKind::Member).into_result()?;
        }
        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        if !user.apply_changes(changes, Utc::now()) {
            tracing::debug!(user_id = %id, "Member update changed nothing");
            return Ok(user);
        }

        let updated = self.users.update(&user).await?;
        tracing::info!(user_id = %id, updated_by = %principal.user_id, "Member updated");
        Ok(updated)
    }

    fn rules(&self, today: chrono::NaiveDate) -> MemberRules<'_> {
        MemberRules {
            email_domain: &self.email_domain,
            today,
        }
    }

    async fn fetch(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity: "Member", id })
    }

    async fn ensure_email_free(&self, email: &Email, owner: Option<Uuid>) -> DomainResult<()> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Constraint(format!(
                "Email {} is already in use",
                email
            ))),
            _ => Ok(()),
        }
    }
}

//! Authorization gate
//!
//! Every service operation asks [`authorize`] before touching validation or
//! the store. The rules live in one static table so handlers cannot drift
//! apart.

use std::fmt;
use uuid::Uuid;

use super::errors::DomainError;
use super::user::Role;

/// The authenticated identity making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    /// Setting or changing a member's role
    AssignRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Budget,
    Member,
    Dashboard,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::AssignRole => "assign role on",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Budget => "budget",
            ResourceKind::Member => "member",
            ResourceKind::Dashboard => "dashboard",
        };
        f.write_str(name)
    }
}

/// Who may perform an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    AnyAuthenticated,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    /// Converts a denial into [`DomainError::Forbidden`]
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(DomainError::Forbidden(reason)),
        }
    }
}

/// The policy table; pairs not listed are denied
pub const POLICY: &[(ResourceKind, Operation, Requirement)] = &[
    (ResourceKind::Budget, Operation::Read, Requirement::AnyAuthenticated),
    (ResourceKind::Budget, Operation::Create, Requirement::Role(Role::Admin)),
    (ResourceKind::Budget, Operation::Update, Requirement::Role(Role::Admin)),
    (ResourceKind::Budget, Operation::Delete, Requirement::Role(Role::Admin)),
    (ResourceKind::Member, Operation::Read, Requirement::AnyAuthenticated),
    (ResourceKind::Member, Operation::Create, Requirement::AnyAuthenticated),
    (ResourceKind::Member, Operation::Update, Requirement::AnyAuthenticated),
    (ResourceKind::Member, Operation::AssignRole, Requirement::Role(Role::Admin)),
    (ResourceKind::Dashboard, Operation::Read, Requirement::AnyAuthenticated),
];

/// Decides whether `principal` may perform `operation` on `resource`
///
/// # Example
/// ```
/// use uuid::Uuid;
/// use zeus_api::domain::policy::{authorize, Decision, Operation, Principal, ResourceKind};
/// use zeus_api::domain::user::Role;
///
/// let member = Principal::new(Uuid::new_v4(), Role::Member);
/// assert_eq!(authorize(&member, Operation::Read, ResourceKind::Budget), Decision::Allow);
/// assert!(matches!(
///     authorize(&member, Operation::Delete, ResourceKind::Budget),
///     Decision::Deny(_)
/// ));
/// ```
pub fn authorize(principal: &Principal, operation: Operation, resource: ResourceKind) -> Decision {
    let requirement = POLICY
        .iter()
        .find(|(r, o, _)| *r == resource && *o == operation)
        .map(|(_, _, requirement)| *requirement);

    match requirement {
        Some(Requirement::AnyAuthenticated) => Decision::Allow,
        Some(Requirement::Role(role)) if principal.role == role => Decision::Allow,
        Some(Requirement::Role(role)) => Decision::Deny(format!(
            "{} role required to {} {}",
            role, operation, resource
        )),
        None => Decision::Deny(format!("{} {} is not permitted", operation, resource)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Principal {
        Principal::new(Uuid::new_v4(), Role::Admin)
    }

    fn member() -> Principal {
        Principal::new(Uuid::new_v4(), Role::Member)
    }

    #[test]
    fn anyone_can_read_budgets_and_members() {
        for principal in [admin(), member()] {
            assert_eq!(
                authorize(&principal, Operation::Read, ResourceKind::Budget),
                Decision::Allow
            );
            assert_eq!(
                authorize(&principal, Operation::Read, ResourceKind::Member),
                Decision::Allow
            );
        }
    }

    #[test]
    fn budget_writes_require_admin() {
        for operation in [Operation::Create, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize(&admin(), operation, ResourceKind::Budget),
                Decision::Allow
            );
            assert!(matches!(
                authorize(&member(), operation, ResourceKind::Budget),
                Decision::Deny(reason) if reason.contains("admin")
            ));
        }
    }

    #[test]
    fn members_can_create_and_update_members() {
        assert_eq!(
            authorize(&member(), Operation::Create, ResourceKind::Member),
            Decision::Allow
        );
        assert_eq!(
            authorize(&member(), Operation::Update, ResourceKind::Member),
            Decision::Allow
        );
    }

    #[test]
    fn role_assignment_requires_admin() {
        assert!(matches!(
            authorize(&member(), Operation::AssignRole, ResourceKind::Member),
            Decision::Deny(_)
        ));
        assert_eq!(
            authorize(&admin(), Operation::AssignRole, ResourceKind::Member),
            Decision::Allow
        );
    }

    #[test]
    fn unlisted_operations_are_denied() {
        assert!(matches!(
            authorize(&admin(), Operation::Delete, ResourceKind::Member),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn denial_converts_to_forbidden() {
        let result = authorize(&member(), Operation::Delete, ResourceKind::Budget).into_result();
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::user::{Email, Role, User};

/// Repository trait for User aggregate
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; a taken email fails with `UniqueViolation`
    async fn create(&self, user: &User) -> RepositoryResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;

    /// Find every user whose ID is in `ids`
    async fn find_many(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>>;

    /// All users ordered by full name
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    /// Persist profile changes (not the password)
    async fn update(&self, user: &User) -> RepositoryResult<User>;

    /// Replace the password hash and the rotation flag
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> RepositoryResult<()>;

    /// Number of users holding `role`
    async fn count_by_role(&self, role: Role) -> RepositoryResult<i64>;
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_db_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, UserRepository};
use crate::domain::user::{Email, Gender, Role, User};

const USER_COLUMNS: &str = "id, full_name, date_of_birth, email, password_hash, role, \
     phone_number, gender, photo_url, admission_date, skills, is_active, \
     must_change_password, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    full_name: String,
    date_of_birth: NaiveDate,
    email: String,
    password_hash: String,
    role: Role,
    phone_number: String,
    gender: Gender,
    photo_url: Option<String>,
    admission_date: NaiveDate,
    skills: Vec<String>,
    is_active: bool,
    must_change_password: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&r.email)
            .map_err(|e| RepositoryError::Database(format!("Invalid email from database: {}", e)))?;

        Ok(User {
            id: r.id,
            full_name: r.full_name,
            date_of_birth: r.date_of_birth,
            email,
            password_hash: r.password_hash,
            role: r.role,
            phone_number: r.phone_number,
            gender: r.gender,
            photo_url: r.photo_url,
            admission_date: r.admission_date,
            skills: r.skills,
            is_active: r.is_active,
            must_change_password: r.must_change_password,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (
                id, full_name, date_of_birth, email, password_hash, role,
                phone_number, gender, photo_url, admission_date, skills,
                is_active, must_change_password, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(user.date_of_birth)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.phone_number)
            .bind(user.gender)
            .bind(&user.photo_url)
            .bind(user.admission_date)
            .bind(&user.skills)
            .bind(user.is_active)
            .bind(user.must_change_password)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to create user"))?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find user by id"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find user by email"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> RepositoryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to find users by id"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY full_name", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to list users"))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET full_name = $2, date_of_birth = $3, email = $4, role = $5,
                phone_number = $6, gender = $7, photo_url = $8,
                admission_date = $9, skills = $10, is_active = $11,
                updated_at = $12
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(user.date_of_birth)
            .bind(user.email.as_str())
            .bind(user.role)
            .bind(&user.phone_number)
            .bind(user.gender)
            .bind(&user.photo_url)
            .bind(user.admission_date)
            .bind(&user.skills)
            .bind(user.is_active)
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to update user"))?
            .ok_or(RepositoryError::NotFound {
                entity: "User",
                id: user.id,
            })?;

        User::try_from(row)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, must_change_password = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(must_change_password)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "User", id });
        }
        Ok(())
    }

    async fn count_by_role(&self, role: Role) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to count users"))
    }
}

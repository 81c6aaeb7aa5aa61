//! User repository
//!
//! Database operations for users and roles. Roles are joined through
//! the user_roles link table; user creation inserts the user and its
//! role links in one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scribe_models::{Role, RoleCode, User};

use crate::repository::{NewUser, RepositoryError, RepositoryResult, UserStore};

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password: Option<String>,
    profile_pic_url: Option<String>,
    verified: bool,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct RoleRow {
    id: Uuid,
    code: String,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for Role {
    type Error = RepositoryError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let code = RoleCode::from_str(&row.code).map_err(RepositoryError::Decode)?;
        Ok(Role {
            id: row.id,
            code,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl UserRow {
    fn into_user(self, roles: Vec<Role>) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            password: self.password,
            profile_pic_url: self.profile_pic_url,
            roles,
            verified: self.verified,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User repository implementation
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn roles_for(&self, user_id: Uuid) -> RepositoryResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.code, r.status, r.created_at, r.updated_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
              AND r.status = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Role::try_from).collect()
    }
}

const USER_COLUMNS: &str =
    "id, email, name, password, profile_pic_url, verified, status, created_at, updated_at";

#[async_trait]
impl UserStore for UserRepository {
    async fn fetch_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND status = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let roles = self.roles_for(row.id).await?;
                Ok(Some(row.into_user(roles)))
            }
            None => Ok(None),
        }
    }

    async fn fetch_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND status = TRUE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let roles = self.roles_for(row.id).await?;
                Ok(Some(row.into_user(roles)))
            }
            None => Ok(None),
        }
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, name, password, profile_pic_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(&new_user.profile_pic_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match err {
            // two signups racing on the same email
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("user already registered".into())
            }
            other => other.into(),
        })?;

        for role in &new_user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(role.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into_user(new_user.roles))
    }

    async fn fetch_role_by_code(&self, code: RoleCode) -> RepositoryResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, code, status, created_at, updated_at
            FROM roles
            WHERE code = $1
              AND status = TRUE
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Role::try_from).transpose()
    }

    async fn create_role(&self, code: RoleCode) -> RepositoryResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (code)
            VALUES ($1)
            RETURNING id, code, status, created_at, updated_at
            "#,
        )
        .bind(code.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn delete_role(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_by_email(&self, email: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

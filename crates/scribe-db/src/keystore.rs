//! Keystore repository
//!
//! Database operations for session rows. Revocation is row deletion;
//! there is no background sweep of rows whose tokens have expired.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scribe_models::Keystore;

use crate::repository::{RepositoryResult, SessionStore};

#[derive(Debug, Clone, FromRow)]
struct KeystoreRow {
    id: Uuid,
    user_id: Uuid,
    primary_key: String,
    secondary_key: String,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<KeystoreRow> for Keystore {
    fn from(row: KeystoreRow) -> Self {
        Keystore {
            id: row.id,
            user_id: row.user_id,
            primary_key: row.primary_key,
            secondary_key: row.secondary_key,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Keystore repository implementation
pub struct KeystoreRepository {
    pool: PgPool,
}

impl KeystoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for KeystoreRepository {
    async fn create(
        &self,
        user_id: Uuid,
        primary_key: &str,
        secondary_key: &str,
    ) -> RepositoryResult<Keystore> {
        let row = sqlx::query_as::<_, KeystoreRow>(
            r#"
            INSERT INTO keystore (user_id, primary_key, secondary_key)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, primary_key, secondary_key, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(primary_key)
        .bind(secondary_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        primary_key: &str,
    ) -> RepositoryResult<Option<Keystore>> {
        let row = sqlx::query_as::<_, KeystoreRow>(
            r#"
            SELECT id, user_id, primary_key, secondary_key, status, created_at, updated_at
            FROM keystore
            WHERE user_id = $1
              AND primary_key = $2
              AND status = TRUE
            "#,
        )
        .bind(user_id)
        .bind(primary_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_for_refresh(
        &self,
        user_id: Uuid,
        primary_key: &str,
        secondary_key: &str,
    ) -> RepositoryResult<Option<Keystore>> {
        let row = sqlx::query_as::<_, KeystoreRow>(
            r#"
            SELECT id, user_id, primary_key, secondary_key, status, created_at, updated_at
            FROM keystore
            WHERE user_id = $1
              AND primary_key = $2
              AND secondary_key = $3
              AND status = TRUE
            "#,
        )
        .bind(user_id)
        .bind(primary_key)
        .bind(secondary_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM keystore WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

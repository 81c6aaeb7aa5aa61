//! API key repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scribe_models::ApiKey;

use crate::repository::{ApiKeyStore, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct ApiKeyRow {
    id: Uuid,
    key: String,
    version: i32,
    permissions: Vec<String>,
    comments: Vec<String>,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ApiKeyRow> for ApiKey {
    fn from(row: ApiKeyRow) -> Self {
        ApiKey {
            id: row.id,
            key: row.key,
            version: row.version,
            permissions: row.permissions,
            comments: row.comments,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// API key repository implementation
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for ApiKeyRepository {
    async fn find_active_by_key(&self, key: &str) -> RepositoryResult<Option<ApiKey>> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, key, version, permissions, comments, status, created_at, updated_at
            FROM api_keys
            WHERE key = $1
              AND status = TRUE
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_key(
        &self,
        key: &str,
        version: i32,
        permissions: &[String],
        comments: &[String],
    ) -> RepositoryResult<ApiKey> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (key, version, permissions, comments)
            VALUES ($1, $2, $3, $4)
            RETURNING id, key, version, permissions, comments, status, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(version)
        .bind(permissions)
        .bind(comments)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_key(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

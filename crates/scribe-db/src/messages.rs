//! Contact message repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scribe_models::Message;

use crate::repository::{MessageStore, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct MessageRow {
    id: Uuid,
    kind: String,
    msg: String,
    status: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            kind: row.kind,
            msg: row.msg,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Message repository implementation
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn create_message(&self, kind: &str, msg: &str) -> RepositoryResult<Message> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (kind, msg)
            VALUES ($1, $2)
            RETURNING id, kind, msg, status, created_at, updated_at
            "#,
        )
        .bind(kind)
        .bind(msg)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

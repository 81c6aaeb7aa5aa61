//! Keystore model
//!
//! One row per live login. `primary_key` is the jti of the access
//! token, `secondary_key` the jti of the paired refresh token. The row
//! is the sole source of truth for whether the pair is still valid;
//! deleting it revokes the pair regardless of the tokens' own expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keystore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub primary_key: String,
    pub secondary_key: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

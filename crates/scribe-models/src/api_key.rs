//! API key model
//!
//! Shared secrets gating all traffic at the outermost layer. Immutable
//! once issued except for deactivation (`status = false`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known permission strings
pub mod permission {
    pub const GENERAL: &str = "GENERAL";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: Uuid,
    pub key: String,
    pub version: i32,
    pub permissions: Vec<String>,
    pub comments: Vec<String>,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

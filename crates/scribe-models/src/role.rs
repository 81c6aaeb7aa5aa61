//! Role model
//!
//! Roles are a small fixed enumeration with stable codes. A user holds
//! zero or more of them; authorization checks only look at the codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable role codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    Learner,
    Author,
    Editor,
    Admin,
}

impl RoleCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCode::Learner => "LEARNER",
            RoleCode::Author => "AUTHOR",
            RoleCode::Editor => "EDITOR",
            RoleCode::Admin => "ADMIN",
        }
    }
}

impl std::str::FromStr for RoleCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEARNER" => Ok(RoleCode::Learner),
            "AUTHOR" => Ok(RoleCode::Author),
            "EDITOR" => Ok(RoleCode::Editor),
            "ADMIN" => Ok(RoleCode::Admin),
            other => Err(format!("unknown role code: {other}")),
        }
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub code: RoleCode,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Blog entity
///
/// A blog moves through drafted -> submitted -> published; `draft_text`
/// holds the working copy and `text` the published copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub text: Option<String>,
    pub draft_text: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub img_url: Option<String>,
    pub slug: String,
    pub score: f64,
    pub views: i64,
    pub likes: i64,
    pub submitted: bool,
    pub drafted: bool,
    pub published: bool,
    pub status: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact listing shape for paginated blog feeds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub img_url: Option<String>,
    pub score: f64,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

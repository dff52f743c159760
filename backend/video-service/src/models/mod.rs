/// Data models for video-service
///
/// - Video: a persisted asset (registry row + remote object)
/// - User: an owner and the bearer token it authenticates with
/// - Request/response bodies for the HTTP surface
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the acting owner, resolved by the auth gate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Video database entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: String,
    /// Staged file name; the remote key is `videos/<file_name>`
    pub file_name: String,
    pub size: i64,
    /// Seconds, always measured by the inspector
    pub duration: f64,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn storage_key(&self) -> String {
        video_core::storage_key(&self.file_name)
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.user_id == owner.0
    }

    pub fn content_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or(video_core::constants::MERGED_CONTENT_TYPE)
    }
}

/// Fields recorded when an upload completes
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub user_id: OwnerId,
    pub file_name: String,
    pub size: i64,
    pub duration: f64,
    pub mime_type: String,
}

/// User database entity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Trim body. Values stay raw JSON so that non-numeric input can be
/// reported with its own message instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrimRequest {
    #[serde(default)]
    pub start: Option<serde_json::Value>,
    #[serde(default)]
    pub end: Option<serde_json::Value>,
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequest {
    #[serde(default, rename = "videoIds")]
    pub video_ids: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeResponse {
    pub message: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub url: String,
}

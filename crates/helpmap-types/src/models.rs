use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_ROLE: &str = "help";
pub const UNKNOWN_NAME: &str = "Unknown";
pub const HELP_REQUEST_OPEN: &str = "open";
pub const DEFAULT_HELP_CATEGORY: &str = "other";
pub const DEFAULT_FORUM_CATEGORY: &str = "general";

/// Public view of a user. The stored row additionally carries the password
/// hash, which never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub role: String,
    pub created_at: NaiveDateTime,
}

// Caller-supplied references (`creator_id`, `sender_id`, `rating`, ...) are
// kept as whatever JSON the client sent. Older data files hold them as
// strings as often as numbers.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: u64,
    pub creator_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub creator: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    /// Always `"open"`; nothing transitions it.
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Direct message. Messages are not filtered by participant when listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub sender: String,
    pub receiver_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub receiver: String,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumTopic {
    pub id: u64,
    pub creator_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub creator: String,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    pub comments_count: u64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub reviewer_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub reviewer: String,
    pub volunteer_id: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub volunteer: String,
    pub rating: Option<Value>,
    #[serde(deserialize_with = "null_as_empty")]
    pub comment: String,
    pub created_at: NaiveDateTime,
}

/// Stored files may carry an explicit `null` where a defaulted string is
/// expected (a client that sent `"category": null`).
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

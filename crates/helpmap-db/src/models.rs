//! Stored record shapes that differ from the API models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use helpmap_types::models::{ForumTopic, HelpRequest, Message, Review, User, null_as_empty};

/// A user as persisted in `users.json`, password hash included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl UserRow {
    /// Drop the password hash.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Anything stored in a collection with a sequential id.
pub trait Record {
    fn id(&self) -> u64;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> u64 {
                self.id
            }
        })*
    };
}

impl_record!(UserRow, HelpRequest, Message, ForumTopic, Review);

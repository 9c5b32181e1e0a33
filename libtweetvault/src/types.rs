//! Core types for Tweetvault

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tweet as fetched from the remote API.
///
/// The structured fields are the ones the archive engine needs for
/// deduplication, watermarking and reply resolution. `payload` keeps the
/// complete attribute set returned by the API and is what gets persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub author_id: u64,
    pub in_reply_to_id: Option<u64>,
    pub payload: Value,
}

impl Tweet {
    /// Build a tweet from a raw API status object.
    ///
    /// Returns `None` when the object is missing the id or author fields,
    /// which means it is not a status at all.
    pub fn from_json(value: Value) -> Option<Self> {
        let id = value.get("id")?.as_u64()?;
        let author_id = value.get("user")?.get("id")?.as_u64()?;
        let in_reply_to_id = value
            .get("in_reply_to_status_id")
            .and_then(|v| v.as_u64());

        Some(Self {
            id,
            author_id,
            in_reply_to_id,
            payload: value,
        })
    }

    /// True if this tweet is a reply authored by `user_id`
    pub fn is_self_reply(&self, user_id: u64) -> bool {
        self.in_reply_to_id.is_some() && self.author_id == user_id
    }
}

impl PartialEq for Tweet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tweet {}

/// The authenticated account an archive run operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: u64,
    pub screen_name: String,
}

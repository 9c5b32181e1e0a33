//! Tweetvault - incremental tweet archiver
//!
//! This library implements the archive engine: rate-limited pagination
//! over a Twitter account's timelines, cross-source merging, reply-parent
//! resolution and idempotent persistence into a per-profile SQLite store.

pub mod api;
pub mod archive;
pub mod config;
pub mod db;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use api::{FetchParams, TimelineApi, TimelineSource};
pub use config::Config;
pub use db::{Database, InsertOutcome};
pub use error::{ApiError, Result, TweetvaultError};
pub use types::{Account, Tweet};

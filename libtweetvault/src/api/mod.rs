//! Timeline API abstraction
//!
//! The archive engine only talks to the remote service through the
//! [`TimelineApi`] trait: one paged fetch per named timeline, one
//! single-tweet lookup, and credential verification to learn whose account
//! the run is archiving. The real HTTP client lives in [`twitter`]; a
//! scriptable [`mock`] backs the tests.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::{Account, Tweet};

pub mod mock;
pub mod twitter;

/// The three timelines an archive run drains, in fetch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineSource {
    UserTimeline,
    Mentions,
    Favorites,
}

impl TimelineSource {
    /// Fetch order for a run: own posts, then mentions, then favorites.
    /// Dedup is first-occurrence-wins, so this order is also the tiebreak.
    pub const ALL: [TimelineSource; 3] = [
        TimelineSource::UserTimeline,
        TimelineSource::Mentions,
        TimelineSource::Favorites,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimelineSource::UserTimeline => "user_timeline",
            TimelineSource::Mentions => "mentions_timeline",
            TimelineSource::Favorites => "favorites",
        }
    }
}

impl std::fmt::Display for TimelineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters for one timeline page request.
///
/// `since_id` is the run's watermark and never changes within a run;
/// `max_id` is the pagination cursor owned by a single paginator
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub since_id: Option<u64>,
    pub max_id: Option<u64>,
    pub count: u32,
    pub include_rts: bool,
}

impl FetchParams {
    /// Base parameters for a run with the given watermark
    pub fn since(since_id: Option<u64>) -> Self {
        Self {
            since_id,
            ..Self::default()
        }
    }

    /// The same parameters with the pagination cursor set
    pub fn with_max_id(&self, max_id: u64) -> Self {
        Self {
            max_id: Some(max_id),
            ..self.clone()
        }
    }
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            since_id: None,
            max_id: None,
            count: 200,
            include_rts: true,
        }
    }
}

/// Remote timeline service, as seen by the archive engine
#[async_trait]
pub trait TimelineApi: Send + Sync {
    /// Resolve the authenticated account (id and screen name)
    async fn verify_credentials(&self) -> ApiResult<Account>;

    /// Fetch one page of the given timeline
    async fn fetch_timeline(
        &self,
        source: TimelineSource,
        params: &FetchParams,
    ) -> ApiResult<Vec<Tweet>>;

    /// Fetch a single tweet by id
    async fn fetch_tweet(&self, id: u64) -> ApiResult<Tweet>;
}

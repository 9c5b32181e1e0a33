//! Mock timeline API for testing
//!
//! A scriptable implementation of [`TimelineApi`]: tests queue pages and
//! lookup results (including errors) ahead of time and inspect afterwards
//! exactly which requests the archive engine issued. Available outside
//! `cfg(test)` so integration tests can drive full archive runs without
//! network access.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::api::{FetchParams, TimelineApi, TimelineSource};
use crate::error::{ApiError, ApiResult};
use crate::types::{Account, Tweet};

/// Build a minimal but structurally complete tweet for tests
pub fn sample_tweet(id: u64, author_id: u64, in_reply_to_id: Option<u64>) -> Tweet {
    let payload = json!({
        "id": id,
        "user": { "id": author_id },
        "in_reply_to_status_id": in_reply_to_id,
        "text": format!("tweet {}", id),
    });
    Tweet::from_json(payload).unwrap()
}

#[derive(Default)]
struct MockState {
    pages: HashMap<TimelineSource, VecDeque<ApiResult<Vec<Tweet>>>>,
    lookups: HashMap<u64, VecDeque<ApiResult<Tweet>>>,
    timeline_requests: Vec<(TimelineSource, FetchParams)>,
    lookup_requests: Vec<u64>,
    verify_calls: usize,
}

pub struct MockApi {
    account: Account,
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new(account_id: u64, screen_name: &str) -> Self {
        Self {
            account: Account {
                id: account_id,
                screen_name: screen_name.to_string(),
            },
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Queue the next response for a timeline source. Once the queue for a
    /// source is empty, further requests return an empty page.
    pub fn push_page(&self, source: TimelineSource, result: ApiResult<Vec<Tweet>>) {
        self.state
            .lock()
            .unwrap()
            .pages
            .entry(source)
            .or_default()
            .push_back(result);
    }

    /// Queue the next response for a single-tweet lookup. An id with no
    /// queued response answers 404.
    pub fn push_lookup(&self, id: u64, result: ApiResult<Tweet>) {
        self.state
            .lock()
            .unwrap()
            .lookups
            .entry(id)
            .or_default()
            .push_back(result);
    }

    /// Every timeline request issued, in order
    pub fn timeline_requests(&self) -> Vec<(TimelineSource, FetchParams)> {
        self.state.lock().unwrap().timeline_requests.clone()
    }

    /// Every single-tweet lookup issued, in order
    pub fn lookup_requests(&self) -> Vec<u64> {
        self.state.lock().unwrap().lookup_requests.clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.state.lock().unwrap().verify_calls
    }
}

#[async_trait]
impl TimelineApi for MockApi {
    async fn verify_credentials(&self) -> ApiResult<Account> {
        self.state.lock().unwrap().verify_calls += 1;
        Ok(self.account.clone())
    }

    async fn fetch_timeline(
        &self,
        source: TimelineSource,
        params: &FetchParams,
    ) -> ApiResult<Vec<Tweet>> {
        let mut state = self.state.lock().unwrap();
        state.timeline_requests.push((source, params.clone()));

        match state.pages.get_mut(&source).and_then(|q| q.pop_front()) {
            Some(result) => result,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_tweet(&self, id: u64) -> ApiResult<Tweet> {
        let mut state = self.state.lock().unwrap();
        state.lookup_requests.push(id);

        match state.lookups.get_mut(&id).and_then(|q| q.pop_front()) {
            Some(result) => result,
            None => Err(ApiError::Request {
                status: 404,
                message: format!("No status found with that ID ({})", id),
            }),
        }
    }
}

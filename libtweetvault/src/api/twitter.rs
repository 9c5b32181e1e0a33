//! Twitter REST v1.1 client
//!
//! Thin HTTP layer over the endpoints the archiver needs. Throttling (HTTP
//! 429) is surfaced as `ApiError::RateLimited` carrying the server-signaled
//! reset delay; the archive engine owns the retry loop.

use reqwest::{Response, StatusCode};
use std::time::Duration;

use crate::api::{FetchParams, TimelineApi, TimelineSource};
use crate::error::{ApiError, ApiResult};
use crate::types::{Account, Tweet};

const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

/// Fallback wait when a 429 arrives without a usable reset header
const DEFAULT_RESET: Duration = Duration::from_secs(60);

pub struct TwitterApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterApi {
    /// Create a client against the standard API base
    pub fn new(bearer_token: String) -> Self {
        Self::with_base_url(bearer_token, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a custom base URL (used with API proxies
    /// and test stubs)
    pub fn with_base_url(bearer_token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Unexpected(format!("invalid JSON body: {}", e)))
    }
}

#[async_trait::async_trait]
impl TimelineApi for TwitterApi {
    async fn verify_credentials(&self) -> ApiResult<Account> {
        let value = self.get("account/verify_credentials.json", &[]).await?;

        let id = value
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ApiError::Unexpected("credentials object has no id".to_string()))?;
        let screen_name = value
            .get("screen_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Account { id, screen_name })
    }

    async fn fetch_timeline(
        &self,
        source: TimelineSource,
        params: &FetchParams,
    ) -> ApiResult<Vec<Tweet>> {
        let value = self.get(endpoint(source), &build_query(params)).await?;

        let statuses = value
            .as_array()
            .ok_or_else(|| ApiError::Unexpected("timeline response is not an array".to_string()))?;

        statuses
            .iter()
            .map(|status| {
                Tweet::from_json(status.clone()).ok_or_else(|| {
                    ApiError::Unexpected("timeline entry is not a status".to_string())
                })
            })
            .collect()
    }

    async fn fetch_tweet(&self, id: u64) -> ApiResult<Tweet> {
        let value = self
            .get("statuses/show.json", &[("id", id.to_string())])
            .await?;

        Tweet::from_json(value)
            .ok_or_else(|| ApiError::Unexpected(format!("lookup of {} is not a status", id)))
    }
}

fn endpoint(source: TimelineSource) -> &'static str {
    match source {
        TimelineSource::UserTimeline => "statuses/user_timeline.json",
        TimelineSource::Mentions => "statuses/mentions_timeline.json",
        TimelineSource::Favorites => "favorites/list.json",
    }
}

fn build_query(params: &FetchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("count", params.count.to_string()),
        ("include_rts", if params.include_rts { "1" } else { "0" }.to_string()),
    ];

    if let Some(since_id) = params.since_id {
        query.push(("since_id", since_id.to_string()));
    }
    if let Some(max_id) = params.max_id {
        query.push(("max_id", max_id.to_string()));
    }

    query
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset_after = response
            .headers()
            .get("x-rate-limit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .map(|reset| reset_delay(reset, chrono::Utc::now().timestamp()))
            .unwrap_or(DEFAULT_RESET);

        return Err(ApiError::RateLimited { reset_after });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Authentication(format!(
            "credentials rejected (HTTP {})",
            status.as_u16()
        )));
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ApiError::Request {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

/// Delay until the signaled reset epoch, never less than one second
fn reset_delay(reset_epoch: i64, now_epoch: i64) -> Duration {
    Duration::from_secs(reset_epoch.saturating_sub(now_epoch).max(1) as u64)
}

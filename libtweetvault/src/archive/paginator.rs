//! Rate-limited timeline pagination
//!
//! Drives one timeline source to exhaustion. Cursoring uses the id of the
//! oldest tweet in the most recent page as the next `max_id`; because
//! `max_id` is inclusive, adjacent pages share that boundary tweet and a
//! page of a single item means only the boundary itself remains, which is
//! the termination signal. Dedup happens later, in the merger.

use tokio::time::sleep;
use tracing::warn;

use crate::api::{FetchParams, TimelineApi, TimelineSource};
use crate::error::{ApiError, ApiResult};
use crate::types::Tweet;

/// Fetch one page, sleeping through rate limits.
///
/// A throttled request is re-issued unchanged after the signaled reset
/// delay, as many times as it takes. Every other error propagates.
async fn fetch_page(
    api: &dyn TimelineApi,
    source: TimelineSource,
    params: &FetchParams,
) -> ApiResult<Vec<Tweet>> {
    loop {
        match api.fetch_timeline(source, params).await {
            Err(ApiError::RateLimited { reset_after }) => {
                warn!(
                    source = source.name(),
                    wait_secs = reset_after.as_secs(),
                    "hit rate limit, retrying after reset"
                );
                sleep(reset_after).await;
            }
            other => return other,
        }
    }
}

/// Drain one timeline source down to the watermark.
///
/// Returns the concatenation of all pages, boundary overlaps included.
pub async fn fetch_source(
    api: &dyn TimelineApi,
    source: TimelineSource,
    since_id: Option<u64>,
) -> ApiResult<Vec<Tweet>> {
    let base = FetchParams::since(since_id);

    let mut tweets = fetch_page(api, source, &base).await?;
    let mut page_len = tweets.len();

    // A page of fewer than two items means no progress marker remains
    while page_len >= 2 {
        let cursor = match tweets.last() {
            Some(oldest) => oldest.id,
            None => break,
        };

        let page = fetch_page(api, source, &base.with_max_id(cursor)).await?;
        page_len = page.len();
        tweets.extend(page);
    }

    Ok(tweets)
}

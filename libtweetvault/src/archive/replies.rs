//! Reply resolution
//!
//! After the merge, the account's own replies may point at parent tweets
//! that none of the three timelines carried. Those parents are fetched one
//! by one; single-tweet lookups share the account's rate-limit budget, so
//! the fetches stay strictly sequential.

use std::collections::HashSet;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::api::TimelineApi;
use crate::archive::merge;
use crate::error::{ApiError, ApiResult};
use crate::types::Tweet;

async fn fetch_tweet(api: &dyn TimelineApi, id: u64) -> ApiResult<Tweet> {
    loop {
        match api.fetch_tweet(id).await {
            Err(ApiError::RateLimited { reset_after }) => {
                warn!(
                    id,
                    wait_secs = reset_after.as_secs(),
                    "hit rate limit, retrying after reset"
                );
                sleep(reset_after).await;
            }
            other => return other,
        }
    }
}

/// Fetch the parents of the account's own replies that the merged set does
/// not already contain.
///
/// A failed lookup (parent deleted, protected, ...) is logged and skipped;
/// it never aborts the run. The returned parents are id-unique but may
/// still overlap the input set; the caller unions them with id-wins
/// dedup.
pub async fn resolve_missing_parents(
    api: &dyn TimelineApi,
    tweets: &[Tweet],
    account_id: u64,
) -> Vec<Tweet> {
    let known: HashSet<u64> = tweets.iter().map(|t| t.id).collect();

    let wanted: Vec<(u64, u64)> = tweets
        .iter()
        .filter(|t| t.is_self_reply(account_id))
        .filter_map(|t| t.in_reply_to_id.map(|parent| (parent, t.id)))
        .filter(|(parent, _)| !known.contains(parent))
        .collect();

    let mut parents = Vec::new();
    for (parent_id, reply_id) in wanted {
        match fetch_tweet(api, parent_id).await {
            Ok(tweet) => parents.push(tweet),
            Err(e) => {
                error!(
                    parent = parent_id,
                    reply = reply_id,
                    error = %e,
                    "could not fetch replied-to tweet, skipping"
                );
            }
        }
    }

    let parents = merge::dedup_by_id(parents);
    info!(count = parents.len(), "resolved replied-to tweets");
    parents
}

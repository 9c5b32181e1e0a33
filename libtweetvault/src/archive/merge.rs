//! Multi-source merge
//!
//! Runs the paginator over the three timeline sources in their fixed order
//! and unions the results by tweet id.

use std::collections::HashSet;

use tracing::info;

use crate::api::{TimelineApi, TimelineSource};
use crate::archive::paginator;
use crate::error::Result;
use crate::types::Tweet;

/// Drop repeated ids, keeping the first occurrence of each
pub(crate) fn dedup_by_id(tweets: Vec<Tweet>) -> Vec<Tweet> {
    let mut seen = HashSet::new();
    tweets
        .into_iter()
        .filter(|tweet| seen.insert(tweet.id))
        .collect()
}

/// Fetch all sources down to the watermark and union them.
///
/// Sources are drained strictly in `TimelineSource::ALL` order, so on an
/// id collision the earlier source's copy wins.
pub async fn fetch_merged(api: &dyn TimelineApi, since_id: Option<u64>) -> Result<Vec<Tweet>> {
    let mut all = Vec::new();

    for source in TimelineSource::ALL {
        let tweets = paginator::fetch_source(api, source, since_id).await?;
        info!(
            source = source.name(),
            count = tweets.len(),
            "fetched timeline"
        );
        all.extend(tweets);
    }

    let merged = dedup_by_id(all);
    info!(count = merged.len(), "merged unique tweets across sources");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_tweet, MockApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_sources_fetched_in_order() {
        let api = MockApi::new(42, "archiver");

        fetch_merged(&api, None).await.unwrap();

        let sources: Vec<TimelineSource> =
            api.timeline_requests().iter().map(|(s, _)| *s).collect();
        assert_eq!(
            sources,
            vec![
                TimelineSource::UserTimeline,
                TimelineSource::Mentions,
                TimelineSource::Favorites,
            ]
        );
    }

    #[tokio::test]
    async fn test_merge_unions_and_dedups() {
        let api = MockApi::new(42, "archiver");
        // 3 + 3 + 3 tweets with 2 overlapping ids across sources
        api.push_page(
            TimelineSource::UserTimeline,
            Ok(vec![
                sample_tweet(6, 42, None),
                sample_tweet(5, 42, None),
                sample_tweet(4, 42, None),
            ]),
        );
        api.push_page(
            TimelineSource::Mentions,
            Ok(vec![
                sample_tweet(9, 7, None),
                sample_tweet(8, 7, None),
                sample_tweet(5, 42, None),
            ]),
        );
        api.push_page(
            TimelineSource::Favorites,
            Ok(vec![
                sample_tweet(12, 9, None),
                sample_tweet(8, 7, None),
                sample_tweet(11, 9, None),
            ]),
        );

        let merged = fetch_merged(&api, None).await.unwrap();

        let mut ids: Vec<u64> = merged.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![4, 5, 6, 8, 9, 11, 12]);
    }

    #[tokio::test]
    async fn test_first_source_wins_on_collision() {
        let api = MockApi::new(42, "archiver");

        let mut own_copy = sample_tweet(5, 42, None);
        own_copy.payload = json!({ "id": 5, "user": { "id": 42 }, "origin": "own" });
        let mut fav_copy = sample_tweet(5, 42, None);
        fav_copy.payload = json!({ "id": 5, "user": { "id": 42 }, "origin": "fav" });

        api.push_page(TimelineSource::UserTimeline, Ok(vec![own_copy]));
        api.push_page(TimelineSource::Favorites, Ok(vec![fav_copy]));

        let merged = fetch_merged(&api, None).await.unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].payload["origin"], "own");
    }

    #[tokio::test]
    async fn test_watermark_passed_to_every_source() {
        let api = MockApi::new(42, "archiver");

        fetch_merged(&api, Some(1234)).await.unwrap();

        for (_, params) in api.timeline_requests() {
            assert_eq!(params.since_id, Some(1234));
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let tweets = vec![
            sample_tweet(1, 42, None),
            sample_tweet(2, 42, None),
            sample_tweet(1, 7, None),
            sample_tweet(3, 42, None),
            sample_tweet(2, 7, None),
        ];

        let unique = dedup_by_id(tweets);
        let ids: Vec<u64> = unique.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // First occurrence's author survives
        assert_eq!(unique[0].author_id, 42);
    }
}

//! Idempotent persistence
//!
//! Inserts the run's tweet set row by row. A duplicate id is the normal
//! re-run collision and only gets logged; any other store error aborts the
//! batch because it indicates a structural problem.

use tracing::{error, info};

use crate::db::{Database, InsertOutcome};
use crate::error::Result;
use crate::types::Tweet;

/// Counts from one persistence pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub inserted: u64,
    pub duplicates: u64,
}

/// Write the final tweet set to the store
pub async fn persist_all(db: &Database, tweets: &[Tweet]) -> Result<PersistReport> {
    info!(count = tweets.len(), "dumping tweets to database");

    let mut report = PersistReport::default();
    for tweet in tweets {
        match db.insert_tweet(tweet).await? {
            InsertOutcome::Inserted => report.inserted += 1,
            InsertOutcome::Duplicate => {
                error!(id = tweet.id, "tweet already archived, skipping");
                report.duplicates += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::sample_tweet;
    use sqlx::sqlite::SqlitePool;

    async fn memory_db() -> Database {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        Database::from_pool(pool)
    }

    #[tokio::test]
    async fn test_persists_whole_batch() {
        let db = memory_db().await;
        let tweets = vec![
            sample_tweet(1, 42, None),
            sample_tweet(2, 42, None),
            sample_tweet(3, 7, None),
        ];

        let report = persist_all(&db, &tweets).await.unwrap();
        assert_eq!(report, PersistReport { inserted: 3, duplicates: 0 });
        assert_eq!(db.tweet_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_skipped_batch_continues() {
        let db = memory_db().await;
        db.insert_tweet(&sample_tweet(100, 42, None)).await.unwrap();

        // Stored max id is 100; the source returned 100 and 101
        let tweets = vec![sample_tweet(100, 42, None), sample_tweet(101, 42, None)];

        let report = persist_all(&db, &tweets).await.unwrap();
        assert_eq!(report, PersistReport { inserted: 1, duplicates: 1 });
        assert_eq!(db.tweet_count().await.unwrap(), 2);
        assert_eq!(db.max_stored_id().await.unwrap(), Some(101));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let db = memory_db().await;
        let report = persist_all(&db, &[]).await.unwrap();
        assert_eq!(report, PersistReport::default());
    }
}

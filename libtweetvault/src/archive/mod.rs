//! The incremental archive engine
//!
//! One run is a fixed pipeline: compute the watermark, drain and merge the
//! three timelines, resolve missing reply parents, persist. There is no
//! mid-run checkpointing. The watermark only advances once rows commit,
//! so a killed run is simply re-run.

use tracing::info;

use crate::api::TimelineApi;
use crate::db::Database;
use crate::error::Result;
use crate::types::Account;

pub mod merge;
pub mod paginator;
pub mod persist;
pub mod replies;

/// What one archive run did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub account: Account,
    /// Size of the final unique tweet set handed to the persister
    pub unique_tweets: usize,
    pub inserted: u64,
    pub duplicates: u64,
}

/// Execute one archive run for the authenticated account.
///
/// Everything is strictly sequential: sources in their fixed order, then
/// reply resolution, then persistence. The API client and database handle
/// are held exclusively for the duration of the run.
pub async fn run(api: &dyn TimelineApi, db: &Database) -> Result<RunReport> {
    let account = api.verify_credentials().await?;
    info!(account = %account.screen_name, "getting tweets");

    let since_id = db.max_stored_id().await?;
    match since_id {
        Some(id) => info!(since_id = id, "getting tweets since last archived id"),
        None => info!("getting tweets since the beginning of time"),
    }

    let merged = merge::fetch_merged(api, since_id).await?;
    let parents = replies::resolve_missing_parents(api, &merged, account.id).await;

    let mut tweets = merged;
    tweets.extend(parents);
    let tweets = merge::dedup_by_id(tweets);
    info!(count = tweets.len(), "collected unique tweets");

    let persisted = persist::persist_all(db, &tweets).await?;
    info!(
        inserted = persisted.inserted,
        duplicates = persisted.duplicates,
        "archive run complete"
    );

    Ok(RunReport {
        account,
        unique_tweets: tweets.len(),
        inserted: persisted.inserted,
        duplicates: persisted.duplicates,
    })
}

//! Database operations for Tweetvault
//!
//! The store is a single `tweets` relation keyed by tweet id. Rows are
//! never updated; a second run that fetches an already archived tweet gets
//! a `Duplicate` outcome and moves on.

use sqlx::sqlite::SqlitePool;
use std::path::Path;

use crate::error::{DbError, Result};
use crate::types::Tweet;

/// Outcome of a single insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The tweet id already exists in the store
    Duplicate,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(db_path: &str) -> Result<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DbError::IoError)?;
        }

        // Use forward slashes for the SQLite URL and mode=rwc so the file
        // is created on first run
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(DbError::SqlxError)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(DbError::MigrationError)?;

        Ok(Self { pool })
    }

    /// Wrap an already connected pool. The caller is responsible for
    /// having run the migrations (tests use this with in-memory SQLite).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The highest tweet id already archived in this store, if any.
    ///
    /// This is the incremental watermark: every fetch in a run uses it as
    /// the `since_id` lower bound. The store is per profile, so the
    /// account scope is the database itself and mentions or favorites by
    /// other authors advance the watermark too. `None` means an empty
    /// store and the run archives from the beginning of time.
    pub async fn max_stored_id(&self) -> Result<Option<u64>> {
        let row = sqlx::query_as::<_, (Option<i64>,)>(
            r#"
            SELECT MAX(id) FROM tweets
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::SqlxError)?;

        Ok(row.0.map(|id| id as u64))
    }

    /// Insert one tweet, skipping on a pre-existing id.
    ///
    /// A unique-key violation is the expected re-run collision and is
    /// reported as `InsertOutcome::Duplicate`; any other failure is a real
    /// store error and propagates.
    pub async fn insert_tweet(&self, tweet: &Tweet) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO tweets (id, user_id, data)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(tweet.id as i64)
        .bind(tweet.author_id as i64)
        .bind(tweet.payload.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(db_err))
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(DbError::SqlxError(e).into()),
        }
    }

    /// Number of archived tweets, across all authors
    pub async fn tweet_count(&self) -> Result<u64> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM tweets")
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::SqlxError)?;

        Ok(row.0 as u64)
    }
}

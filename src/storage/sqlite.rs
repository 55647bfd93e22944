//! SQLite sample store
//!
//! ## Features
//!
//! - **Embedded**: a single database file next to the binary
//! - **WAL mode**: the read API can list rows while the monitor writes
//! - **Migrations**: tables are bootstrapped with `CREATE TABLE IF NOT EXISTS`,
//!   so reopening an existing file is a no-op
//!
//! ## Atomic recording
//!
//! A sample is recorded inside one transaction: the instant insert and the
//! daily upsert run on the same connection and commit together. The upsert
//! is a single `INSERT ... ON CONFLICT DO UPDATE` statement, so the first
//! sample of a day never races into a duplicate-key failure.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite, Transaction};
use tracing::{debug, info, instrument, warn};

use super::backend::{HealthStatus, SampleStore, StoreStats};
use super::error::{StorageError, StorageResult};
use super::schema::{
    DailyAggregate, Sample, format_day, local_day, millis_to_timestamp, parse_day,
    timestamp_to_millis,
};

/// SQLite-backed sample store
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    db_path: String,
}

impl SqliteStore {
    /// Open (or create) the database and make sure both tables exist
    ///
    /// Failing here is the one unrecoverable condition of the monitor: the
    /// caller is expected to abort startup.
    #[instrument(skip_all)]
    pub async fn new(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("opening sample store at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!("bootstrapping schema");
        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("sample store ready");

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    /// Both writes of a sample, on the caller's transaction
    async fn write_sample(
        tx: &mut Transaction<'_, Sqlite>,
        millis: i64,
        up: bool,
        day: &str,
    ) -> StorageResult<(i64, i64)> {
        sqlx::query("INSERT INTO instant_feed (time, up) VALUES (?, ?)")
            .bind(millis)
            .bind(up)
            .execute(&mut **tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db)
                    if db.is_unique_violation() || db.message().contains("UNIQUE") =>
                {
                    StorageError::DuplicateSample(millis)
                }
                other => other.into(),
            })?;

        let (up_inc, down_inc) = if up { (1_i64, 0_i64) } else { (0, 1) };

        let counts: (i64, i64) = sqlx::query_as(
            r#"
            INSERT INTO daily_averages (date, up_count, down_count)
            VALUES (?, ?, ?)
            ON CONFLICT (date) DO UPDATE SET
                up_count = up_count + excluded.up_count,
                down_count = down_count + excluded.down_count
            RETURNING up_count, down_count
            "#,
        )
        .bind(day)
        .bind(up_inc)
        .bind(down_inc)
        .fetch_one(&mut **tx)
        .await?;

        Ok(counts)
    }

    fn decode_sample(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Sample> {
        let millis: i64 = row.try_get("time")?;
        let timestamp = millis_to_timestamp(millis)
            .ok_or_else(|| StorageError::CorruptRow(format!("timestamp out of range: {millis}")))?;

        Ok(Sample {
            timestamp,
            up: row.try_get("up")?,
        })
    }

    fn decode_aggregate(row: &sqlx::sqlite::SqliteRow) -> StorageResult<DailyAggregate> {
        let raw: String = row.try_get("date")?;
        let date =
            parse_day(&raw).ok_or_else(|| StorageError::CorruptRow(format!("bad date: {raw}")))?;

        Ok(DailyAggregate {
            date,
            up_count: row.try_get::<i64, _>("up_count")? as u64,
            down_count: row.try_get::<i64, _>("down_count")? as u64,
        })
    }
}

#[async_trait]
impl SampleStore for SqliteStore {
    #[instrument(skip(self), fields(at = %at))]
    async fn record_sample(&self, up: bool, at: DateTime<Utc>) -> StorageResult<DailyAggregate> {
        let millis = timestamp_to_millis(&at);
        let date = local_day(at);
        let day = format_day(date);

        let mut tx = self.pool.begin().await?;

        match Self::write_sample(&mut tx, millis, up, &day).await {
            Ok((up_count, down_count)) => {
                tx.commit().await?;
                debug!("today's checks now: {} up, {} down", up_count, down_count);

                Ok(DailyAggregate {
                    date,
                    up_count: up_count as u64,
                    down_count: down_count as u64,
                })
            }
            Err(e) => {
                warn!("rolling back sample: {}", e);
                if let Err(rollback) = tx.rollback().await {
                    warn!("rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(before = %before))]
    async fn cleanup_old_samples(&self, before: DateTime<Utc>) -> StorageResult<usize> {
        let before_millis = timestamp_to_millis(&before);

        let result = sqlx::query("DELETE FROM instant_feed WHERE time < ?")
            .bind(before_millis)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() as usize;
        debug!("deleted {} instant records before {}", deleted, before);

        Ok(deleted)
    }

    async fn list_samples(&self) -> StorageResult<Vec<Sample>> {
        let rows = sqlx::query("SELECT time, up FROM instant_feed ORDER BY time ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::decode_sample).collect()
    }

    async fn list_daily_aggregates(&self) -> StorageResult<Vec<DailyAggregate>> {
        let rows = sqlx::query(
            "SELECT date, up_count, down_count FROM daily_averages ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::decode_aggregate).collect()
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<HealthStatus> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                let mut metadata = HashMap::new();
                metadata.insert("backend".to_string(), "sqlite".to_string());
                metadata.insert("db_path".to_string(), self.db_path.clone());

                Ok(HealthStatus {
                    healthy: true,
                    message: "SQLite store operational".to_string(),
                    metadata,
                })
            }
            Err(e) => {
                warn!("health check failed: {}", e);
                Ok(HealthStatus {
                    healthy: false,
                    message: format!("health check failed: {}", e),
                    metadata: HashMap::new(),
                })
            }
        }
    }

    async fn get_stats(&self) -> StorageResult<StoreStats> {
        let (samples, oldest, newest): (i64, Option<i64>, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), MIN(time), MAX(time) FROM instant_feed")
                .fetch_one(&self.pool)
                .await?;

        let (days,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM daily_averages")
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreStats {
            samples: samples as u64,
            days: days as u64,
            oldest_sample: oldest.and_then(millis_to_timestamp),
            newest_sample: newest.and_then(millis_to_timestamp),
        })
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing sample store");
        self.pool.close().await;
        Ok(())
    }
}

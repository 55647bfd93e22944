//! In-memory sample store (no persistence)
//!
//! Same semantics as the SQLite store, kept in two ordered maps behind a
//! lock. Useful for:
//! - Exercising the monitor and retention loops without a database
//! - Simulating storage outages (see [`MemoryStore::set_fail_writes`])
//!
//! ## Limitations
//!
//! - **No persistence**: all data lost on restart

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{HealthStatus, SampleStore, StoreStats};
use super::error::{StorageError, StorageResult};
use super::schema::{DailyAggregate, Sample, local_day, millis_to_timestamp, timestamp_to_millis};

#[derive(Default)]
struct Tables {
    /// Unix millis -> up
    instant: BTreeMap<i64, bool>,

    daily: BTreeMap<NaiveDate, DailyAggregate>,
}

/// In-memory sample store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,

    /// When set, every write fails without touching the tables
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "writes disabled on in-memory store".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn record_sample(&self, up: bool, at: DateTime<Utc>) -> StorageResult<DailyAggregate> {
        self.check_writable()?;

        let millis = timestamp_to_millis(&at);
        let date = local_day(at);

        let mut tables = self.tables.write().await;
        if tables.instant.contains_key(&millis) {
            return Err(StorageError::DuplicateSample(millis));
        }

        tables.instant.insert(millis, up);
        let aggregate = tables
            .daily
            .entry(date)
            .or_insert_with(|| DailyAggregate::empty(date));
        aggregate.record(up);

        debug!(
            "today's checks now: {} up, {} down",
            aggregate.up_count, aggregate.down_count
        );

        Ok(*aggregate)
    }

    async fn cleanup_old_samples(&self, before: DateTime<Utc>) -> StorageResult<usize> {
        self.check_writable()?;

        let before_millis = timestamp_to_millis(&before);
        let mut tables = self.tables.write().await;

        // split_off keeps keys >= before in the returned map
        let kept = tables.instant.split_off(&before_millis);
        let deleted = tables.instant.len();
        tables.instant = kept;

        debug!("deleted {} instant records before {}", deleted, before);
        Ok(deleted)
    }

    async fn list_samples(&self) -> StorageResult<Vec<Sample>> {
        let tables = self.tables.read().await;

        tables
            .instant
            .iter()
            .map(|(&millis, &up)| {
                millis_to_timestamp(millis)
                    .map(|timestamp| Sample { timestamp, up })
                    .ok_or_else(|| {
                        StorageError::CorruptRow(format!("timestamp out of range: {millis}"))
                    })
            })
            .collect()
    }

    async fn list_daily_aggregates(&self) -> StorageResult<Vec<DailyAggregate>> {
        let tables = self.tables.read().await;
        Ok(tables.daily.values().copied().collect())
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        let writable = !self.fail_writes.load(Ordering::SeqCst);

        Ok(HealthStatus {
            healthy: writable,
            message: if writable {
                "In-memory store operational".to_string()
            } else {
                "In-memory store rejecting writes".to_string()
            },
            metadata: HashMap::from([("backend".to_string(), "memory".to_string())]),
        })
    }

    async fn get_stats(&self) -> StorageResult<StoreStats> {
        let tables = self.tables.read().await;

        Ok(StoreStats {
            samples: tables.instant.len() as u64,
            days: tables.daily.len() as u64,
            oldest_sample: tables
                .instant
                .keys()
                .next()
                .copied()
                .and_then(millis_to_timestamp),
            newest_sample: tables
                .instant
                .keys()
                .next_back()
                .copied()
                .and_then(millis_to_timestamp),
        })
    }

    async fn close(&self) -> StorageResult<()> {
        debug!("closing in-memory store (no-op)");
        Ok(())
    }
}

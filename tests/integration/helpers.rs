//! Helper functions for integration tests

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use uptime_monitor::monitors::{NetTransport, Prober, Target};
use uptime_monitor::storage::{
    DailyAggregate, HealthStatus, Sample, SampleStore, StorageError, StorageResult, StoreStats,
    sqlite::SqliteStore,
};

/// Fresh SQLite store in a temporary directory
///
/// The directory must outlive the store, so it is returned alongside.
pub async fn create_test_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(temp_dir.path().join("uptime.db"))
        .await
        .unwrap();
    (temp_dir, Arc::new(store))
}

/// Local wall-clock time converted to UTC
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(year, month, day, hour, min, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

/// Prober pointed at a local address with short stage timeouts
pub fn create_local_prober(host: &str, port: u16, url: String) -> Prober<NetTransport> {
    Prober::new(
        NetTransport::new().unwrap(),
        Target {
            host: host.to_string(),
            port,
            url,
        },
        vec![Duration::from_millis(200), Duration::from_millis(400)],
    )
}

/// Store whose every operation fails
pub struct FailingStore;

fn outage() -> StorageError {
    StorageError::Unavailable("database is locked".to_string())
}

#[async_trait]
impl SampleStore for FailingStore {
    async fn record_sample(&self, _up: bool, _at: DateTime<Utc>) -> StorageResult<DailyAggregate> {
        Err(outage())
    }

    async fn cleanup_old_samples(&self, _before: DateTime<Utc>) -> StorageResult<usize> {
        Err(outage())
    }

    async fn list_samples(&self) -> StorageResult<Vec<Sample>> {
        Err(outage())
    }

    async fn list_daily_aggregates(&self) -> StorageResult<Vec<DailyAggregate>> {
        Err(outage())
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        Err(outage())
    }

    async fn get_stats(&self) -> StorageResult<StoreStats> {
        Err(outage())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

//! Sample store trait definition
//!
//! The store exclusively owns the instant feed and the daily rollups. The
//! monitor loop and the retention sweeper write through it, the read API
//! only lists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::StorageResult;
use super::schema::{DailyAggregate, Sample};

/// Health status of the store
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Is the store operational?
    pub healthy: bool,

    /// Human-readable status message
    pub message: String,

    /// Store-specific metadata
    pub metadata: std::collections::HashMap<String, String>,
}

/// Row counts and the time span currently covered by the instant feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Rows in the instant feed
    pub samples: u64,

    /// Rows in the daily rollup table
    pub days: u64,

    pub oldest_sample: Option<DateTime<Utc>>,

    pub newest_sample: Option<DateTime<Utc>>,
}

/// Durable record of probe results
///
/// Implementations must be `Send + Sync`: one handle is shared by the
/// monitor loop, the retention sweeper and the read API.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Persist one probe result and bump the counter for its local day
    ///
    /// Both writes happen atomically: on error neither the sample nor the
    /// rollup change is visible. Returns the day's counts after the update.
    async fn record_sample(&self, up: bool, at: DateTime<Utc>) -> StorageResult<DailyAggregate>;

    /// Delete instant samples strictly older than `before`
    ///
    /// Daily rollups are never touched. Returns the number of deleted rows.
    async fn cleanup_old_samples(&self, before: DateTime<Utc>) -> StorageResult<usize>;

    /// All instant samples, oldest first
    async fn list_samples(&self) -> StorageResult<Vec<Sample>>;

    /// All daily rollups, oldest day first
    async fn list_daily_aggregates(&self) -> StorageResult<Vec<DailyAggregate>>;

    /// Lightweight check that the store answers
    async fn health_check(&self) -> StorageResult<HealthStatus>;

    async fn get_stats(&self) -> StorageResult<StoreStats>;

    /// Release resources
    async fn close(&self) -> StorageResult<()>;
}

//! Integration tests for storage persistence
//!
//! These tests verify that:
//! - Samples and daily rollups survive reopening the database file
//! - Retention cleanup removes old samples but keeps the rollups

use chrono::{Duration, Utc};
use std::time::Duration as StdDuration;
use uptime_monitor::actors::retention_cutoff;
use uptime_monitor::storage::{SampleStore, sqlite::SqliteStore};

use crate::helpers::{create_test_store, local_time};

#[tokio::test]
async fn test_samples_survive_reopen() {
    let (temp_dir, store) = create_test_store().await;

    store
        .record_sample(true, local_time(2024, 6, 12, 10, 0))
        .await
        .unwrap();
    store
        .record_sample(false, local_time(2024, 6, 12, 10, 30))
        .await
        .unwrap();
    store
        .record_sample(true, local_time(2024, 6, 13, 0, 5))
        .await
        .unwrap();
    store.close().await.unwrap();

    let reopened = SqliteStore::new(temp_dir.path().join("uptime.db"))
        .await
        .unwrap();

    let samples = reopened.list_samples().await.unwrap();
    assert_eq!(
        samples.iter().map(|s| s.up).collect::<Vec<_>>(),
        vec![true, false, true]
    );

    let days = reopened.list_daily_aggregates().await.unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!((days[0].up_count, days[0].down_count), (1, 1));
    assert_eq!((days[1].up_count, days[1].down_count), (1, 0));

    // counting continues on the existing row
    let today = reopened
        .record_sample(false, local_time(2024, 6, 13, 0, 35))
        .await
        .unwrap();
    assert_eq!((today.up_count, today.down_count), (1, 1));
}

#[tokio::test]
async fn test_retention_keeps_rollups() {
    let (_temp_dir, store) = create_test_store().await;
    let now = Utc::now();

    for hours in [72, 49, 47, 1] {
        store
            .record_sample(true, now - Duration::hours(hours))
            .await
            .unwrap();
    }

    let cutoff = retention_cutoff(now, StdDuration::from_secs(48 * 3600));
    let deleted = store.cleanup_old_samples(cutoff).await.unwrap();
    assert_eq!(deleted, 2);

    let samples = store.list_samples().await.unwrap();
    assert_eq!(samples.len(), 2);
    assert!(samples.iter().all(|s| s.timestamp >= cutoff));

    let total: u64 = store
        .list_daily_aggregates()
        .await
        .unwrap()
        .iter()
        .map(|day| day.total())
        .sum();
    assert_eq!(total, 4);

    // a second sweep has nothing left to do
    assert_eq!(store.cleanup_old_samples(cutoff).await.unwrap(), 0);
}

#[tokio::test]
async fn test_stats_track_feed_span() {
    let (_temp_dir, store) = create_test_store().await;

    let first = local_time(2024, 6, 12, 10, 0);
    let last = local_time(2024, 6, 12, 11, 0);
    store.record_sample(true, first).await.unwrap();
    store.record_sample(true, last).await.unwrap();

    let stats = store.get_stats().await.unwrap();
    assert_eq!(stats.samples, 2);
    assert_eq!(stats.days, 1);
    assert_eq!(stats.oldest_sample, Some(first));
    assert_eq!(stats.newest_sample, Some(last));
}

//! End-to-end tests of the monitor and retention loops
//!
//! Real prober (against wiremock), real SQLite store, real actors.

use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use uptime_monitor::actors::{MonitorHandle, RetentionHandle};
use uptime_monitor::config::LoggingConfig;
use uptime_monitor::storage::{SampleStore, schema::local_day};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{FailingStore, create_local_prober, create_test_store};

const HOUR: StdDuration = StdDuration::from_secs(3600);

#[tokio::test]
async fn test_monitor_records_into_todays_rollup() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (_temp_dir, store) = create_test_store().await;
    let prober = create_local_prober(
        "127.0.0.1",
        mock_server.address().port(),
        mock_server.uri(),
    );

    let monitor = MonitorHandle::spawn(
        Arc::new(prober),
        store.clone(),
        HOUR,
        LoggingConfig::default(),
    );

    // immediate first cycle
    tokio::time::sleep(StdDuration::from_millis(300)).await;
    assert!(monitor.probe_now().await.unwrap());

    monitor.shutdown().await.unwrap();

    let samples = store.list_samples().await.unwrap();
    assert_eq!(samples.len(), 2);
    assert!(samples.iter().all(|s| s.up));

    let days = store.list_daily_aggregates().await.unwrap();
    let today = days
        .iter()
        .find(|day| day.date == local_day(samples[1].timestamp))
        .unwrap();
    assert!(today.up_count >= 1);
    assert_eq!(days.iter().map(|day| day.total()).sum::<u64>(), 2);
}

#[tokio::test]
async fn test_unreachable_target_records_down() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (_temp_dir, store) = create_test_store().await;
    let prober = create_local_prober(
        "127.0.0.1",
        mock_server.address().port(),
        mock_server.uri(),
    );

    let monitor = MonitorHandle::spawn(
        Arc::new(prober),
        store.clone(),
        HOUR,
        LoggingConfig::default(),
    );
    tokio::time::sleep(StdDuration::from_millis(300)).await;

    let stats = monitor.get_stats().await.unwrap();
    assert_eq!(stats.cycles, 1);
    assert_eq!(stats.down, 1);
    assert_eq!(stats.last_state, Some(false));

    monitor.shutdown().await.unwrap();

    let samples = store.list_samples().await.unwrap();
    assert_eq!(samples.len(), 1);
    assert!(!samples[0].up);
}

#[tokio::test]
async fn test_retention_sweeps_on_startup() {
    let (_temp_dir, store) = create_test_store().await;
    let now = Utc::now();

    store
        .record_sample(true, now - Duration::hours(50))
        .await
        .unwrap();
    store
        .record_sample(false, now - Duration::hours(2))
        .await
        .unwrap();

    let retention = RetentionHandle::spawn(store.clone(), 48 * HOUR, 24 * HOUR);
    tokio::time::sleep(StdDuration::from_millis(200)).await;

    let stats = retention.get_stats().await.unwrap();
    assert_eq!(stats.sweeps, 1);
    assert_eq!(stats.total_deleted, 1);

    retention.shutdown().await.unwrap();

    let samples = store.list_samples().await.unwrap();
    assert_eq!(samples.len(), 1);
    assert!(!samples[0].up);
}

#[tokio::test]
async fn test_failing_store_keeps_both_loops_running() {
    let store = Arc::new(FailingStore);

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    let prober = create_local_prober(
        "127.0.0.1",
        mock_server.address().port(),
        mock_server.uri(),
    );

    let monitor = MonitorHandle::spawn(
        Arc::new(prober),
        store.clone(),
        HOUR,
        LoggingConfig::default(),
    );
    let retention = RetentionHandle::spawn(store, 48 * HOUR, 24 * HOUR);

    tokio::time::sleep(StdDuration::from_millis(300)).await;

    assert!(monitor.probe_now().await.unwrap());
    assert!(retention.sweep_now().await.is_err());

    let monitor_stats = monitor.get_stats().await.unwrap();
    assert_eq!(monitor_stats.record_failures, monitor_stats.cycles);
    assert_eq!(monitor_stats.cycles, 2);

    let retention_stats = retention.get_stats().await.unwrap();
    assert_eq!(retention_stats.failures, 2);

    monitor.shutdown().await.unwrap();
    retention.shutdown().await.unwrap();
}

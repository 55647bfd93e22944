//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - The list endpoints return the `data` envelope the dashboard reads
//! - Health and stats reflect the store
//! - Storage failures surface as 500 with an error body
//! - Static dashboard files are served

use reqwest::StatusCode;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use uptime_monitor::api::{ApiConfig, ApiState, spawn_api_server};
use uptime_monitor::storage::SampleStore;

use crate::helpers::{FailingStore, create_test_store, local_time};

// Helper to create test API server
async fn spawn_test_api(store: Arc<dyn SampleStore>) -> SocketAddr {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
        static_dir: None,
        enable_cors: true,
    };

    spawn_api_server(config, ApiState::new(store)).await.unwrap()
}

async fn get_json(addr: SocketAddr, path: &str) -> (StatusCode, Value) {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_instant_endpoint_lists_samples() {
    let (_temp_dir, store) = create_test_store().await;
    let first = local_time(2024, 6, 12, 10, 0);
    let second = local_time(2024, 6, 12, 10, 30);
    store.record_sample(true, first).await.unwrap();
    store.record_sample(false, second).await.unwrap();

    let addr = spawn_test_api(store).await;
    let (status, json) = get_json(addr, "/api/instant").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"data": [
            {"timestamp": first.to_rfc3339(), "up": true},
            {"timestamp": second.to_rfc3339(), "up": false},
        ]})
    );
}

#[tokio::test]
async fn test_daily_endpoint_lists_rollups() {
    let (_temp_dir, store) = create_test_store().await;
    store
        .record_sample(true, local_time(2024, 6, 12, 10, 0))
        .await
        .unwrap();
    store
        .record_sample(false, local_time(2024, 6, 12, 10, 30))
        .await
        .unwrap();
    store
        .record_sample(true, local_time(2024, 6, 12, 23, 59))
        .await
        .unwrap();
    store
        .record_sample(true, local_time(2024, 6, 13, 8, 0))
        .await
        .unwrap();

    let addr = spawn_test_api(store).await;
    let (status, json) = get_json(addr, "/api/daily").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"data": [
            {"day": "2024-06-12", "up": 2, "down": 1},
            {"day": "2024-06-13", "up": 1, "down": 0},
        ]})
    );
}

#[tokio::test]
async fn test_empty_store_returns_empty_lists() {
    let (_temp_dir, store) = create_test_store().await;
    let addr = spawn_test_api(store).await;

    let (_, instant) = get_json(addr, "/api/instant").await;
    let (_, daily) = get_json(addr, "/api/daily").await;

    assert_eq!(instant, json!({"data": []}));
    assert_eq!(daily, json!({"data": []}));
}

#[tokio::test]
async fn test_health_and_stats_endpoints() {
    let (_temp_dir, store) = create_test_store().await;
    store
        .record_sample(true, local_time(2024, 6, 12, 10, 0))
        .await
        .unwrap();
    let addr = spawn_test_api(store).await;

    let (status, health) = get_json(addr, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert!(health["timestamp"].is_string());

    let (status, stats) = get_json(addr, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["storage"]["samples"], 1);
    assert_eq!(stats["storage"]["days"], 1);
}

#[tokio::test]
async fn test_storage_failure_returns_500() {
    let addr = spawn_test_api(Arc::new(FailingStore)).await;

    for path in ["/api/instant", "/api/daily", "/api/stats"] {
        let (status, json) = get_json(addr, path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert!(json["error"].is_string(), "{path}");
    }

    let (status, health) = get_json(addr, "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_serves_dashboard_files() {
    let (_temp_dir, store) = create_test_store().await;
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>uptime</h1>").unwrap();

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        static_dir: Some(static_dir.path().to_path_buf()),
        enable_cors: false,
    };
    let addr = spawn_api_server(config, ApiState::new(store)).await.unwrap();

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<h1>uptime</h1>");

    // API routes still win over the static fallback
    let (status, _) = get_json(addr, "/api/instant").await;
    assert_eq!(status, StatusCode::OK);
}

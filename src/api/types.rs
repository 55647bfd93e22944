//! API response types
//!
//! Every list endpoint wraps its rows in a `data` field, which is what the
//! dashboard script reads.

use serde::{Deserialize, Serialize};

use crate::storage::schema::format_day;
use crate::storage::{DailyAggregate, HealthStatus, Sample};

/// Response for GET /api/instant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstantResponse {
    pub data: Vec<InstantPoint>,
}

/// One probe result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstantPoint {
    /// RFC3339 timestamp of the probe
    pub timestamp: String,
    pub up: bool,
}

impl From<&Sample> for InstantPoint {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp.to_rfc3339(),
            up: sample.up,
        }
    }
}

/// Response for GET /api/daily
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyResponse {
    pub data: Vec<DailyPoint>,
}

/// Up/down counts for one local day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    /// Day as `YYYY-MM-DD`
    pub day: String,
    pub up: u64,
    pub down: u64,
}

impl From<&DailyAggregate> for DailyPoint {
    fn from(aggregate: &DailyAggregate) -> Self {
        Self {
            day: format_day(aggregate.date),
            up: aggregate.up_count,
            down: aggregate.down_count,
        }
    }
}

/// Response for GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub storage: String,
}

impl HealthResponse {
    pub fn from_health(health: &HealthStatus) -> Self {
        Self {
            status: if health.healthy { "ok" } else { "degraded" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            storage: health.message.clone(),
        }
    }
}

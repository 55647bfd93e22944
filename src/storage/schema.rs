//! Row types for the two uptime tables
//!
//! ## Tables
//!
//! ### `instant_feed`
//! One row per probe result. The timestamp (Unix milliseconds) is the primary
//! key and doubles as the SQLite rowid, so timestamp order and insertion order
//! are the same thing for a single producer.
//!
//! ### `daily_averages`
//! One row per local calendar day that received at least one sample. The
//! counts are permanent history: sweeping the instant feed never touches them.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format used for the `date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// When the probe finished
    pub timestamp: DateTime<Utc>,

    /// Whether the internet was reachable
    pub up: bool,
}

/// Per-day rollup of up/down samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Calendar day in local time
    pub date: NaiveDate,

    pub up_count: u64,

    pub down_count: u64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, up: bool) -> Self {
        Self { timestamp, up }
    }
}

impl DailyAggregate {
    /// Empty rollup for a day that has not seen a sample yet
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            up_count: 0,
            down_count: 0,
        }
    }

    /// Count one more sample for this day
    pub fn record(&mut self, up: bool) {
        if up {
            self.up_count += 1;
        } else {
            self.down_count += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.up_count + self.down_count
    }
}

/// Local calendar day an instant falls on
pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub(crate) fn timestamp_to_millis(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

pub(crate) fn millis_to_timestamp(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

pub(crate) fn format_day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

//! Message types for actor communication
//!
//! Each actor owns an mpsc command receiver; its handle holds the sender.
//! Request/response commands carry a oneshot channel for the answer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;

/// Commands that can be sent to the MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Run one probe-and-record cycle right away
    ///
    /// Answers with the probe result. Queued behind a cycle that is already
    /// running, never run alongside it.
    ProbeNow { respond_to: oneshot::Sender<bool> },

    /// Get the monitor counters
    GetStats {
        respond_to: oneshot::Sender<MonitorStats>,
    },

    /// Stop the loop after the current cycle
    Shutdown,
}

/// Counters kept by the monitor loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    /// Completed probe cycles
    pub cycles: u64,

    pub up: u64,

    pub down: u64,

    /// Cycles whose sample could not be stored
    pub record_failures: u64,

    /// Result of the most recent probe
    pub last_state: Option<bool>,
}

/// Commands that can be sent to the RetentionActor
#[derive(Debug)]
pub enum RetentionCommand {
    /// Sweep immediately, answering with the number of deleted samples
    SweepNow {
        respond_to: oneshot::Sender<anyhow::Result<usize>>,
    },

    /// Get sweep statistics
    GetStats {
        respond_to: oneshot::Sender<RetentionStats>,
    },

    /// Stop the loop after the current sweep
    Shutdown,
}

/// Sweep statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetentionStats {
    /// Sweeps attempted, failed ones included
    pub sweeps: u64,

    pub failures: u64,

    pub total_deleted: u64,

    pub last_sweep: Option<DateTime<Utc>>,
}

//! Internet uptime monitor
//!
//! Probes reachability every 30 seconds, stores each result in SQLite
//! together with a per-day up/down rollup, and prunes raw samples older
//! than 48 hours.

pub mod actors;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod monitors;
pub mod storage;
pub mod util;

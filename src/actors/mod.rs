//! Actor-based monitoring loop
//!
//! Each actor runs as an independent async task and is driven by a ticker.
//! A cloneable handle sends commands over an mpsc channel.
//!
//! ## Architecture Overview
//!
//! ```text
//!              ┌──────────────────┐
//!              │  monitor (main)  │
//!              └────────┬─────────┘
//!                       │ spawns
//!          ┌────────────┴────────────┐
//!          │                         │
//!  ┌───────▼────────┐       ┌────────▼────────┐
//!  │  MonitorActor  │       │ RetentionActor  │
//!  │  every 30s     │       │ every 24h       │
//!  └───────┬────────┘       └────────┬────────┘
//!          │ record_sample           │ cleanup_old_samples
//!          └────────────┬────────────┘
//!                ┌──────▼──────┐
//!                │ SampleStore │
//!                └─────────────┘
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has an mpsc command channel for control messages
//! 2. **Request/Response**: oneshot channels for synchronous queries

pub mod messages;
pub mod monitor;
pub mod retention;

pub use messages::{MonitorStats, RetentionStats};
pub use monitor::MonitorHandle;
pub use retention::{RetentionHandle, retention_cutoff};

//! Sample store: durable record of every probe result
//!
//! Two tables are owned here and nowhere else:
//!
//! - the **instant feed**, one row per probe, swept after the retention window
//! - the **daily rollups**, one row per local calendar day, kept forever
//!
//! ## Backends
//!
//! - **SQLite** (default): a single on-disk database file
//! - **In-Memory**: no persistence, used for testing the loops
//!
//! ## Usage
//!
//! ```no_run
//! use uptime_monitor::storage::{SampleStore, sqlite::SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteStore::new("./uptime.db").await?;
//!     store.record_sample(true, chrono::Utc::now()).await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use backend::{HealthStatus, SampleStore, StoreStats};
pub use error::{StorageError, StorageResult};
pub use schema::{DailyAggregate, Sample};

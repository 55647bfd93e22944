//! RetentionActor - Sweeps old samples from the instant feed
//!
//! The first sweep runs on startup, then once per sweep interval. Each sweep
//! deletes instant samples older than `now - retention`; daily rollups are
//! left alone. A failed sweep is logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::storage::{SampleStore, StorageResult};

use super::messages::{RetentionCommand, RetentionStats};

/// Oldest timestamp a sample may have and still survive a sweep at `now`
pub fn retention_cutoff(now: DateTime<Utc>, retention: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(retention)
        .ok()
        .and_then(|retention| now.checked_sub_signed(retention))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub struct RetentionActor {
    store: Arc<dyn SampleStore>,

    /// Maximum age of instant samples
    retention: Duration,

    interval_duration: Duration,

    command_rx: mpsc::Receiver<RetentionCommand>,

    stats: RetentionStats,
}

impl RetentionActor {
    pub fn new(
        store: Arc<dyn SampleStore>,
        retention: Duration,
        interval_duration: Duration,
        command_rx: mpsc::Receiver<RetentionCommand>,
    ) -> Self {
        debug!(
            "retention cleanup enabled: {:?} window, every {:?}",
            retention, interval_duration
        );

        Self {
            store,
            retention,
            interval_duration,
            command_rx,
            stats: RetentionStats::default(),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting retention actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(RetentionCommand::SweepNow { respond_to }) => {
                            debug!("manual sweep requested");
                            let result = self.sweep().await.map_err(Into::into);
                            let _ = respond_to.send(result);
                        }

                        Some(RetentionCommand::GetStats { respond_to }) => {
                            let _ = respond_to.send(self.stats);
                        }

                        Some(RetentionCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    trace!("scheduled retention sweep triggered");
                    // errors are already logged, the next tick retries
                    let _ = self.sweep().await;
                }
            }
        }

        debug!("retention actor stopped");
    }

    async fn sweep(&mut self) -> StorageResult<usize> {
        let now = Utc::now();
        let before = retention_cutoff(now, self.retention);

        debug!("running retention sweep (deleting samples before {})", before);

        self.stats.sweeps += 1;
        self.stats.last_sweep = Some(now);

        match self.store.cleanup_old_samples(before).await {
            Ok(deleted) => {
                self.stats.total_deleted += deleted as u64;
                if deleted > 0 {
                    info!(
                        "retention sweep complete: deleted {} old samples (total: {})",
                        deleted, self.stats.total_deleted
                    );
                } else {
                    trace!("retention sweep: no old samples to delete");
                }
                Ok(deleted)
            }
            Err(e) => {
                self.stats.failures += 1;
                error!("failed to sweep old samples: {}", e);
                Err(e)
            }
        }
    }
}

/// Handle for controlling the RetentionActor
#[derive(Clone)]
pub struct RetentionHandle {
    sender: mpsc::Sender<RetentionCommand>,
}

impl RetentionHandle {
    pub fn spawn(
        store: Arc<dyn SampleStore>,
        retention: Duration,
        interval_duration: Duration,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = RetentionActor::new(store, retention, interval_duration, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Sweep now, returning the number of deleted samples
    pub async fn sweep_now(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RetentionCommand::SweepNow { respond_to: tx })
            .await?;

        rx.await?
    }

    pub async fn get_stats(&self) -> Result<RetentionStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RetentionCommand::GetStats { respond_to: tx })
            .await?;

        Ok(rx.await?)
    }

    /// Stop the actor and wait until it has exited
    pub async fn shutdown(self) -> Result<()> {
        self.sender.send(RetentionCommand::Shutdown).await?;
        self.sender.closed().await;
        Ok(())
    }
}

//! MonitorActor - Probes reachability and records every result
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Probe → Log up/down → SampleStore::record_sample
//!     ↑
//!     └─── Commands (ProbeNow, GetStats, Shutdown)
//! ```
//!
//! ## Non-overlap
//!
//! The probe and the record run inline in the loop, so a cycle can never
//! start while the previous one is still running. Ticks missed during a
//! slow cycle are skipped rather than replayed in a burst.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument, warn};

use crate::config::LoggingConfig;
use crate::monitors::Probe;
use crate::storage::SampleStore;

use super::messages::{MonitorCommand, MonitorStats};

/// Actor driving the prober on a fixed interval
pub struct MonitorActor {
    probe: Arc<dyn Probe>,

    store: Arc<dyn SampleStore>,

    /// Which outcomes get a log line
    logging: LoggingConfig,

    command_rx: mpsc::Receiver<MonitorCommand>,

    interval_duration: Duration,

    stats: MonitorStats,
}

impl MonitorActor {
    pub fn new(
        probe: Arc<dyn Probe>,
        store: Arc<dyn SampleStore>,
        interval_duration: Duration,
        logging: LoggingConfig,
        command_rx: mpsc::Receiver<MonitorCommand>,
    ) -> Self {
        Self {
            probe,
            store,
            logging,
            command_rx,
            interval_duration,
            stats: MonitorStats::default(),
        }
    }

    /// Run the actor's main loop
    ///
    /// The first cycle runs immediately. The loop ends on a Shutdown
    /// command or when every handle has been dropped.
    #[instrument(skip(self), fields(interval = ?self.interval_duration))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // commands first, so a probe slower than the interval
                // cannot starve Shutdown
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(MonitorCommand::ProbeNow { respond_to }) => {
                            debug!("received ProbeNow command");
                            let up = self.run_cycle().await;
                            let _ = respond_to.send(up);
                        }

                        Some(MonitorCommand::GetStats { respond_to }) => {
                            let _ = respond_to.send(self.stats);
                        }

                        Some(MonitorCommand::Shutdown) => {
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
                    self.run_cycle().await;
                }
            }
        }

        debug!("monitor actor stopped");
    }

    /// One probe, one log line, one sample
    ///
    /// Storage failures are logged and counted; the cadence is unaffected.
    async fn run_cycle(&mut self) -> bool {
        let up = self.probe.probe().await;

        self.stats.cycles += 1;
        self.stats.last_state = Some(up);
        if up {
            self.stats.up += 1;
            if self.logging.log_up {
                info!("internet is up!");
            }
        } else {
            self.stats.down += 1;
            if self.logging.log_down {
                warn!("internet is DOWN!");
            }
        }

        if let Err(e) = self.store.record_sample(up, Utc::now()).await {
            self.stats.record_failures += 1;
            error!("database error when recording state: {}", e);
        }

        up
    }
}

/// Handle for controlling a MonitorActor
#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    /// Spawn a new monitor actor
    pub fn spawn(
        probe: Arc<dyn Probe>,
        store: Arc<dyn SampleStore>,
        interval_duration: Duration,
        logging: LoggingConfig,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = MonitorActor::new(probe, store, interval_duration, logging, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Run a cycle now and return the probe result
    pub async fn probe_now(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::ProbeNow { respond_to: tx })
            .await?;

        Ok(rx.await?)
    }

    pub async fn get_stats(&self) -> Result<MonitorStats> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::GetStats { respond_to: tx })
            .await?;

        Ok(rx.await?)
    }

    /// Stop the actor and wait until it has exited
    pub async fn shutdown(self) -> Result<()> {
        self.sender.send(MonitorCommand::Shutdown).await?;
        self.sender.closed().await;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Fixed-interval pass scheduler
//!
//! Runs [`SyncEngine::reconcile`] on a single background task. Passes never
//! overlap: the next tick is delayed until the running pass returns.
//! Shutdown is cooperative: the signal is only observed between passes, so
//! an in-flight pass always completes.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::engine::{EngineEvent, SyncEngine};
use crate::error::{Error, Result};

/// Drives a [`SyncEngine`] on a fixed interval
pub struct Scheduler {
    engine: SyncEngine,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler running `engine` every `interval`
    ///
    /// A zero interval is a configuration error.
    pub fn new(engine: SyncEngine, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::config("Sync interval must be > 0"));
        }
        Ok(Self { engine, interval })
    }

    /// Spawn the scheduling loop on the current tokio runtime
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let join = tokio::spawn(async move { self.run_until_shutdown(shutdown_rx).await });

        SchedulerHandle { shutdown_tx, join }
    }

    /// Run passes until `shutdown_rx` fires (or its sender is dropped)
    ///
    /// The first pass runs one interval after start.
    pub async fn run_until_shutdown(self, mut shutdown_rx: oneshot::Receiver<()>) {
        info!(
            "Syncing every {}s{}",
            self.interval.as_secs(),
            if self.engine.is_dry_run() { " [DRY-RUN]" } else { "" }
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Shutdown wins over an already-elapsed tick
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {}
            }

            // Not raced against shutdown: a started pass always finishes
            if let Err(e) = self.engine.reconcile().await {
                if e.is_fatal_to_pass() {
                    error!("Pass aborted: {}", e);
                } else {
                    warn!("Pass failed: {}", e);
                }
            }
        }

        info!("Stopped DNS update service.");
        self.engine.emit_event(EngineEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });
    }
}

/// Handle to a spawned [`Scheduler`]
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the worker to exit
    ///
    /// Returns once any in-flight pass has completed.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining reports why
        let _ = self.shutdown_tx.send(());
        self.join
            .await
            .map_err(|e| Error::Other(format!("Scheduler task failed: {}", e)))
    }

    /// Whether the worker has exited
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

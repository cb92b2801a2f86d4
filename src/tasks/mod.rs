//! Background Tasks Module
//!
//! Periodic tasks that run alongside the cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries at a fixed interval
//! - Log flush: drains buffered records to the log file at a fixed interval

mod flusher;
mod sweeper;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::aof::AppendLog;
use crate::error::Result;

pub use flusher::spawn_flush_task;
pub use sweeper::spawn_sweep_task;

// == Periodic Task ==
/// Handle to a tokio task that runs `tick` once per period.
///
/// Stopping never interrupts a tick in progress: the stop signal is only
/// observed between ticks. Dropping the handle also stops the task.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawns the task on the current tokio runtime. The first tick fires
    /// one full `period` after spawning.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            info!(task = name, ?period, "Starting periodic task");

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => tick().await,
                }
            }

            debug!(task = name, "Periodic task stopped");
        });

        Self {
            name,
            stop_tx,
            handle,
        }
    }

    /// Signals the task and waits until it has exited.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!(task = self.name, error = %e, "Periodic task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// == Background Tasks ==
/// The sweeper and flusher of one cache.
#[derive(Debug)]
pub struct BackgroundTasks {
    sweeper: PeriodicTask,
    flusher: PeriodicTask,
    log: Arc<AppendLog>,
}

impl BackgroundTasks {
    pub(crate) fn new(sweeper: PeriodicTask, flusher: PeriodicTask, log: Arc<AppendLog>) -> Self {
        Self {
            sweeper,
            flusher,
            log,
        }
    }

    /// Stops both tasks, then writes whatever is still buffered.
    ///
    /// Returns the number of records written by the final flush.
    pub async fn shutdown(self) -> Result<usize> {
        self.sweeper.stop().await;
        self.flusher.stop().await;

        let written = self.log.flush()?;
        info!(records = written, "Final log flush completed");
        Ok(written)
    }
}

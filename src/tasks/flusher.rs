//! Log Flush Task
//!
//! Background task that periodically drains the log buffer to disk.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::aof::AppendLog;
use crate::tasks::PeriodicTask;

/// Spawns a task that calls [`AppendLog::flush`] every `interval`.
///
/// File I/O runs on the blocking pool. A failed flush is logged and its
/// records are retried on the next tick.
pub fn spawn_flush_task(log: Arc<AppendLog>, interval: Duration) -> PeriodicTask {
    PeriodicTask::spawn("log-flush", interval, move || {
        let log = Arc::clone(&log);
        async move {
            match tokio::task::spawn_blocking(move || log.flush()).await {
                Ok(Ok(0)) => {}
                Ok(Ok(written)) => debug!("Log flush: wrote {} records", written),
                Ok(Err(e)) => error!(error = %e, "Log flush failed, records kept for retry"),
                Err(e) => error!(error = %e, "Log flush task panicked"),
            }
        }
    })
}

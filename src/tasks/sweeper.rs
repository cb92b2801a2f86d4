//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, whether
//! or not anyone reads them. Lazy expiry in `get` still guards every read.

use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, info};

use crate::aof::LogCodec;
use crate::facade::Cache;
use crate::tasks::PeriodicTask;

/// Spawns a task that calls [`Cache::purge_expired`] every `interval`.
///
/// # Example
/// ```ignore
/// let sweeper = spawn_sweep_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweep_task<K, V>(cache: Cache<K, V>, interval: Duration) -> PeriodicTask
where
    K: Hash + Eq + Clone + LogCodec + Send + 'static,
    V: Clone + LogCodec + Send + 'static,
{
    PeriodicTask::spawn("expiry-sweep", interval, move || {
        let cache = cache.clone();
        async move {
            let removed = cache.purge_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::clock::ManualClock;
    use crate::config::Config;

    fn open(dir: &TempDir, clock: &ManualClock) -> Cache<String, String> {
        let config = Config::with_aof_path(dir.path().join("sweep.aof"));
        Cache::open_with_clock(&config, Arc::new(clock.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(0);
        let cache = open(&dir, &clock);

        cache.put("expire_soon".to_string(), "value".to_string(), 50);
        cache.put("long_lived".to_string(), "value".to_string(), 0);
        clock.advance(51);

        let task = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        task.stop().await;

        // Removed without anyone reading it
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().expirations, 1);
        assert_eq!(cache.get(&"long_lived".to_string()), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_stopped() {
        let dir = TempDir::new().unwrap();
        let clock = ManualClock::new(0);
        let cache = open(&dir, &clock);

        let task = spawn_sweep_task(cache, Duration::from_millis(10));
        assert!(!task.is_finished());

        // Returns only once the task has exited
        tokio::time::timeout(Duration::from_secs(1), task.stop())
            .await
            .expect("sweeper should stop promptly");
    }
}

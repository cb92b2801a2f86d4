//! Cache Façade
//!
//! Combines the entry store with the append-only log. Every mutation goes to
//! the store first, then a record is queued on the log; reads never touch the log.

use std::fmt;
use std::hash::Hash;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::aof::{AppendLog, LogCodec, LogRecord};
use crate::cache::{CacheStats, EntryStore, Expiry};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::sync::lock;
use crate::tasks::{spawn_flush_task, spawn_sweep_task, BackgroundTasks};

// == Cache ==
/// Thread-safe, persistent LRU cache with per-entry TTL.
///
/// Clones share the same store and log.
///
/// # Example
/// ```no_run
/// use durable_lru::{Cache, Config};
///
/// let cache: Cache<i64, String> = Cache::open(&Config::default()).unwrap();
/// cache.put(1, "one".to_string(), 3_000);
/// assert_eq!(cache.get(&1), Some("one".to_string()));
/// ```
pub struct Cache<K, V> {
    store: Arc<Mutex<EntryStore<K, V>>>,
    log: Arc<AppendLog>,
    clock: Arc<dyn Clock>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("log", &self.log.path())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + LogCodec + Send + 'static,
    V: Clone + LogCodec + Send + 'static,
{
    // == Constructor ==
    /// Builds the cache and replays the log before returning it.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Same as [`Cache::open`] with an explicit time source.
    pub fn open_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let log = AppendLog::new(&config.aof_path);
        let mut store = EntryStore::new(config.capacity);
        let report = log.replay(&mut store, clock.now_ms())?;
        info!(
            path = %config.aof_path.display(),
            restored = store.len(),
            puts = report.applied_puts,
            removes = report.applied_removes,
            expired = report.expired,
            skipped = report.skipped,
            "Log replay completed"
        );

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            log: Arc::new(log),
            clock,
        })
    }

    // == Get ==
    /// Returns the value for `key`, or `None` if it is absent or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now_ms();
        lock(&self.store).get(key, now)
    }

    // == Put ==
    /// Stores `value` under `key`. A `ttl_ms` of zero or less never expires.
    pub fn put(&self, key: K, value: V, ttl_ms: i64) {
        let expiry = Expiry::from_ttl(ttl_ms, self.clock.now_ms());
        let record = LogRecord::Put {
            key: key.clone(),
            value: value.clone(),
            expiry,
        };

        // Appended under the store lock so the log order matches the store's
        let mut store = lock(&self.store);
        store.insert(key, value, expiry);
        self.log.append(&record);
    }

    // == Remove ==
    /// Deletes `key` and logs the removal if it was present.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut store = lock(&self.store);
        let removed = store.remove(key);
        if removed.is_some() {
            self.log
                .append(&LogRecord::<K, V>::Remove { key: key.clone() });
        }
        removed
    }

    /// Removes every expired entry. Not logged: replay drops them on its own.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        lock(&self.store).purge_expired(now)
    }

    /// Writes buffered log records to disk now.
    pub fn flush(&self) -> Result<usize> {
        self.log.flush()
    }

    /// Rewrites the log file to hold only the live entries.
    pub fn compact(&self) -> Result<usize> {
        self.log.compact(&self.store, self.clock.now_ms())
    }

    // == Background Tasks ==
    /// Starts the expiry sweeper and the log flusher on the current tokio runtime.
    pub fn spawn_background(&self, config: &Config) -> BackgroundTasks {
        let sweeper = spawn_sweep_task(self.clone(), config.sweep_interval());
        let flusher = spawn_flush_task(Arc::clone(&self.log), config.flush_interval());
        BackgroundTasks::new(sweeper, flusher, Arc::clone(&self.log))
    }

    pub fn stats(&self) -> CacheStats {
        lock(&self.store).stats()
    }

    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.store).is_empty()
    }

    pub fn capacity(&self) -> usize {
        lock(&self.store).capacity()
    }

    /// Number of log records not yet flushed.
    pub fn pending_records(&self) -> usize {
        self.log.pending()
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Checks that the index and the recency list describe the same entries.
    pub fn is_consistent(&self) -> bool {
        lock(&self.store).is_consistent()
    }
}

//! Entry Store Module
//!
//! Bounded LRU structure combining a HashMap index with the recency list.
//! The store itself is not synchronized; callers wrap it in a mutex and hold
//! the lock for the whole duration of every operation.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cache::lru::{RecencyList, SlotId};
use crate::cache::{CacheEntry, CacheStats, Expiry};

// == Entry Store ==
/// Capacity-bounded map of entries with LRU eviction and TTL expiry.
///
/// Every key in `index` points at exactly one live slot in `recency`, and every
/// live slot is pointed at by exactly one key.
#[derive(Debug)]
pub struct EntryStore<K, V> {
    index: HashMap<K, SlotId>,
    recency: RecencyList<CacheEntry<K, V>>,
    stats: CacheStats,
    capacity: usize,
}

impl<K, V> EntryStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Panics
    /// Panics if `capacity` is 0. `Config::validate` rejects that before the
    /// façade ever builds a store.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "EntryStore capacity must be > 0");
        Self {
            index: HashMap::with_capacity(capacity),
            recency: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Get ==
    /// Looks up a key and marks it most recently used.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &K, now_ms: u64) -> Option<V> {
        let Some(&slot) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .recency
            .get(slot)
            .map_or(true, |entry| entry.is_expired(now_ms));
        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.recency.move_to_front(slot);
        self.stats.record_hit();
        self.recency.get(slot).map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores a value with a TTL in milliseconds (`<= 0` never expires).
    ///
    /// An existing entry for the key is replaced along with its deadline.
    pub fn put(&mut self, key: K, value: V, ttl_ms: i64, now_ms: u64) {
        self.insert(key, value, Expiry::from_ttl(ttl_ms, now_ms));
    }

    // == Insert ==
    /// Stores a value with an already computed deadline.
    ///
    /// If the key is new and the store is full, the entry next to the LRU
    /// boundary is evicted first, whether or not it has expired.
    pub fn insert(&mut self, key: K, value: V, expiry: Expiry) {
        if let Some(old) = self.index.remove(&key) {
            self.recency.remove(old);
        }

        if self.index.len() >= self.capacity {
            if let Some(victim) = self.recency.pop_back() {
                self.index.remove(&victim.key);
                self.stats.record_eviction();
                debug!("Evicted least recently used entry");
            }
        }

        let slot = self
            .recency
            .push_front(CacheEntry::new(key.clone(), value, expiry));
        self.index.insert(key, slot);
    }

    // == Remove ==
    /// Drops the entry for `key` if present and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.index.remove(key)?;
        self.recency.remove(slot).map(|entry| entry.value)
    }

    // == Purge Expired ==
    /// Removes all entries whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now_ms: u64) -> usize {
        let expired: Vec<K> = self
            .index
            .iter()
            .filter(|(_, &slot)| {
                self.recency
                    .get(slot)
                    .map_or(false, |entry| entry.is_expired(now_ms))
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Snapshot ==
    /// Copies every entry, most recently used first.
    pub fn snapshot(&self) -> Vec<CacheEntry<K, V>> {
        self.recency.iter().cloned().collect()
    }

    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.index.len(),
            ..self.stats
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Verifies the index/list bijection. Used by tests after concurrent runs.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.recency.len()
            && self.index.len() <= self.capacity
            && self.recency.iter().all(|entry| {
                self.index
                    .get(&entry.key)
                    .and_then(|&slot| self.recency.get(slot))
                    .map_or(false, |linked| linked.key == entry.key)
            })
    }
}

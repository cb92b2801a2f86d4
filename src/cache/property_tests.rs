//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the entry store against a simple reference model.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::aof::LogCodec;
use crate::cache::{EntryStore, Expiry};

// == Reference Model ==
/// Recency order kept as a plain vector, most recently used first.
#[derive(Debug, Default)]
struct ModelLru {
    order: Vec<(u8, u32, Expiry)>,
    capacity: usize,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            order: Vec::new(),
            capacity,
        }
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.order.iter().position(|(k, _, _)| *k == key)
    }

    fn get(&mut self, key: u8, now: u64) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.order.remove(pos);
        if entry.2.is_expired(now) {
            return None;
        }
        let value = entry.1;
        self.order.insert(0, entry);
        Some(value)
    }

    /// Returns the evicted key, if any.
    fn put(&mut self, key: u8, value: u32, ttl: i64, now: u64) -> Option<u8> {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
        let evicted = if self.order.len() >= self.capacity {
            self.order.pop().map(|(k, _, _)| k)
        } else {
            None
        };
        self.order.insert(0, (key, value, Expiry::from_ttl(ttl, now)));
        evicted
    }
}

// == Strategies ==
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32, ttl: i64 },
    Get { key: u8 },
    Remove { key: u8 },
    Advance { ms: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (0u8..16, any::<u32>(), -5i64..200)
            .prop_map(|(key, value, ttl)| CacheOp::Put { key, value, ttl }),
        4 => (0u8..16).prop_map(|key| CacheOp::Get { key }),
        1 => (0u8..16).prop_map(|key| CacheOp::Remove { key }),
        1 => (0u64..150).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The store agrees with the model on every lookup, never exceeds its
    // capacity, and evicts exactly the least recently touched key.
    #[test]
    fn prop_store_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut store = EntryStore::new(capacity);
        let mut model = ModelLru::new(capacity);
        let mut now = 1_000u64;

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl } => {
                    let evicted = model.put(key, value, ttl, now);
                    store.put(key, value, ttl, now);
                    if let Some(victim) = evicted {
                        prop_assert!(!store.contains_key(&victim), "key {} should be evicted", victim);
                    }
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key, now), model.get(key, now));
                }
                CacheOp::Remove { key } => {
                    let expected = model.position(key).map(|pos| model.order.remove(pos).1);
                    prop_assert_eq!(store.remove(&key), expected);
                }
                CacheOp::Advance { ms } => now += ms,
            }

            prop_assert!(store.len() <= capacity);
            prop_assert!(store.is_consistent());
        }

        let keys: Vec<u8> = store.snapshot().iter().map(|e| e.key).collect();
        let expected: Vec<u8> = model.order.iter().map(|(k, _, _)| *k).collect();
        prop_assert_eq!(keys, expected);
    }

    // After a sequence of distinct puts beyond capacity, exactly the last
    // `capacity` keys remain.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        count in 1usize..60
    ) {
        let mut store = EntryStore::new(capacity);
        for key in 0..count {
            store.put(key, key, 0, 0);
        }

        prop_assert_eq!(store.len(), count.min(capacity));
        for key in 0..count {
            prop_assert_eq!(store.contains_key(&key), key + capacity >= count);
        }
    }

    // A key with a positive TTL is readable up to and including its deadline
    // and gone right after it.
    #[test]
    fn prop_ttl_expiration_behavior(
        start in 0u64..1_000_000,
        ttl in 1i64..100_000,
        probe in 0u64..100_000
    ) {
        let mut store = EntryStore::new(4);
        store.put(1u8, 7u8, ttl, start);

        let now = start + probe;
        let expected = if probe <= ttl as u64 { Some(7) } else { None };
        prop_assert_eq!(store.get(&1, now), expected);
    }

    // Any string survives the log encoding and never contains whitespace.
    #[test]
    fn prop_string_codec(value in "\\PC{0,32}|[ %\t\r\nA-Za-z]{0,16}") {
        let token = value.encode();
        prop_assert!(!token.is_empty());
        prop_assert!(!token.contains(char::is_whitespace));
        prop_assert_eq!(String::decode(&token).unwrap(), value);
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_evicts_lru() {
        let mut model = ModelLru::new(2);
        model.put(1, 10, 0, 0);
        model.put(2, 20, 0, 0);
        model.get(1, 0);
        assert_eq!(model.put(3, 30, 0, 0), Some(2));
    }

    #[test]
    fn test_store_and_model_agree_on_scenario() {
        let mut store = EntryStore::new(2);
        let mut model = ModelLru::new(2);
        let script = [(1u8, 10u32), (2, 20), (3, 30), (4, 40)];

        for (key, value) in script {
            store.put(key, value, 0, 0);
            model.put(key, value, 0, 0);
        }
        for key in 1..=4u8 {
            assert_eq!(store.get(&key, 0), model.get(key, 0));
        }
    }
}

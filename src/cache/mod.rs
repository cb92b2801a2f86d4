//! Cache Module
//!
//! Bounded in-memory storage with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, Expiry};
pub use stats::CacheStats;
pub use store::EntryStore;

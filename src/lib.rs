//! Durable LRU - A bounded in-memory cache that survives restarts
//!
//! Provides LRU eviction and per-entry TTL expiry, with every mutation recorded
//! in an append-only log that is replayed at startup.

pub mod aof;
pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod tasks;

mod sync;

pub use api::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
pub use facade::Cache;
pub use tasks::BackgroundTasks;

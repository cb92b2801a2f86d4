//! Cache Entry Module
//!
//! Defines expiry deadlines and the payload held by each cache slot.

// == Expiry ==
/// Absolute expiry deadline of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires.
    Never,
    /// The entry expires once the clock passes this Unix timestamp (milliseconds).
    At(u64),
}

impl Expiry {
    // == Constructor ==
    /// Computes the deadline for a TTL given in milliseconds.
    ///
    /// A TTL of zero or less means the entry never expires.
    pub fn from_ttl(ttl_ms: i64, now_ms: u64) -> Self {
        if ttl_ms <= 0 {
            Expiry::Never
        } else {
            Expiry::At(now_ms.saturating_add(ttl_ms as u64))
        }
    }

    // == Is Expired ==
    /// Checks whether the deadline has passed.
    ///
    /// Boundary condition: an entry is expired only when `now` is strictly
    /// greater than its deadline. At exactly the deadline it is still live.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self {
            Expiry::At(deadline) => now_ms > *deadline,
            Expiry::Never => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if the entry never expires.
    ///
    /// Returns `Some(0)` once the deadline is reached.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match self {
            Expiry::At(deadline) => Some(deadline.saturating_sub(now_ms)),
            Expiry::Never => None,
        }
    }
}

// == Cache Entry ==
/// A single key/value pair together with its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    pub expiry: Expiry,
}

impl<K, V> CacheEntry<K, V> {
    pub fn new(key: K, value: V, expiry: Expiry) -> Self {
        Self { key, value, expiry }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expiry.is_expired(now_ms)
    }
}

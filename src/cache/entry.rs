//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiration support.

use crate::options::MaxAge;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `max_age` from now.
    pub fn new(value: V, max_age: MaxAge) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            created_at: now,
            expires_at: max_age.expires_at(now),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry had expired at `now_ms`.
    ///
    /// Expiry is strict: an entry whose `expires_at` equals `now_ms` is
    /// still live at that instant.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => expires < now_ms,
            None => false,
        }
    }

    /// Checks whether the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, or None if the entry never
    /// expires. Expired entries report `Some(0)`.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            u64::try_from(expires.saturating_sub(now)).unwrap_or(0)
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

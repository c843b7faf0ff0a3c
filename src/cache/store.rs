//! Cache Store Module
//!
//! URL-keyed map with lazy expiration and deduplication of in-flight values.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, PendingSet, Waiter};
use crate::error::Result;
use crate::normalize::{normalize, CanonicalUrl, UrlKey};
use crate::options::{CacheOptions, CallOptions};

// == URL Cache ==
/// In-memory cache keyed by normalized URL.
///
/// Expired entries are only removed when their key is touched, or by an
/// explicit [`clean`](UrlCache::clean). Reads therefore take `&mut self`.
/// The cache does no locking of its own; share it behind a lock.
#[derive(Debug)]
pub struct UrlCache<V> {
    /// Entries keyed by canonical URL
    entries: HashMap<String, CacheEntry<V>>,
    /// Keys announced or waited on but not yet set
    pending: PendingSet<V>,
    /// Lookup statistics
    stats: CacheStats,
    /// Immutable instance configuration
    options: Arc<CacheOptions>,
}

impl<V> Default for UrlCache<V> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<V> UrlCache<V> {
    // == Constructor ==
    /// Creates an empty cache using `options`.
    ///
    /// Passing an `Arc` lets several caches share one configuration.
    pub fn new(options: impl Into<Arc<CacheOptions>>) -> Self {
        Self {
            entries: HashMap::new(),
            pending: PendingSet::new(),
            stats: CacheStats::new(),
            options: options.into(),
        }
    }

    /// Creates an empty cache sharing the process-wide default options.
    pub fn with_defaults() -> Self {
        Self::new(CacheOptions::defaults())
    }

    /// Returns the instance configuration.
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    // == Canonicalize ==
    /// Normalizes `key` with the instance profile.
    pub fn canonicalize<'k>(&self, key: impl Into<UrlKey<'k>>) -> Result<CanonicalUrl> {
        self.canonicalize_with(key.into(), None)
    }

    fn canonicalize_with(&self, key: UrlKey<'_>, call: Option<&CallOptions>) -> Result<CanonicalUrl> {
        normalize(key, self.options.resolve_profile(call))
    }

    // == Get ==
    /// Returns the live value stored for `key`.
    ///
    /// An expired entry is evicted first and reported as absent. Pending keys
    /// are absent too; use [`wait`](UrlCache::wait) to be notified.
    pub fn get<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<Option<&V>> {
        let key = self.canonicalize(key)?;
        self.evict_if_expired(key.as_str());

        match self.entries.get(key.as_str()) {
            Some(entry) => {
                self.stats.record_hit();
                Ok(Some(&entry.value))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Has ==
    /// Reports whether a live value is stored for `key`.
    pub fn has<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<bool> {
        let key = self.canonicalize(key)?;
        self.evict_if_expired(key.as_str());
        Ok(self.entries.contains_key(key.as_str()))
    }

    // == Delete ==
    /// Removes the entry and any pending marker for `key`.
    ///
    /// Waiters on a discarded marker never receive a value. Returns whether
    /// an entry was removed.
    pub fn delete<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<bool> {
        let key = self.canonicalize(key)?;

        let discarded = self.pending.discard(key.as_str());
        if discarded > 0 {
            debug!(key = %key, waiters = discarded, "Discarded pending waiters");
        }

        Ok(self.remove_entry(key.as_str()))
    }

    // == Clear ==
    /// Removes every entry and pending marker.
    pub fn clear(&mut self) {
        let discarded = self.pending.clear();
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);

        debug!(removed, discarded, "Cache cleared");
    }

    /// Removes a single key; same as [`delete`](UrlCache::delete).
    pub fn clear_key<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<bool> {
        self.delete(key)
    }

    // == Clean ==
    /// Removes every expired entry without waiting for it to be accessed.
    ///
    /// Returns the number of entries removed.
    pub fn clean(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.prune_pending();
        self.stats.set_total_entries(self.entries.len());

        if removed > 0 {
            info!("Clean: removed {} expired entries", removed);
        } else {
            debug!("Clean: no expired entries found");
        }
        removed
    }

    // == Pending ==
    /// Declares that a value for `key` is being fetched.
    ///
    /// Returns true only for the first announcement while the key has no
    /// live value; waiters queued earlier through [`wait`](UrlCache::wait)
    /// do not count. The caller that gets true is the one expected to `set`
    /// the value.
    pub fn announce<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<bool> {
        let key = self.canonicalize(key)?;
        self.evict_if_expired(key.as_str());

        if self.entries.contains_key(key.as_str()) {
            return Ok(false);
        }
        Ok(self.pending.announce(key.as_str()))
    }

    /// Reports whether `key` is announced or has a waiter still listening.
    pub fn is_pending<'k>(&self, key: impl Into<UrlKey<'k>>) -> Result<bool> {
        let key = self.canonicalize(key)?;
        Ok(self.pending.contains(key.as_str()))
    }

    /// Removes pending markers whose waiters were all dropped and that no
    /// fetcher announced. Returns the number of markers removed.
    pub fn prune_pending(&mut self) -> usize {
        let removed = self.pending.prune();
        if removed > 0 {
            debug!(removed, "Pruned abandoned pending keys");
        }
        removed
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys currently pending.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    fn evict_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(current_timestamp_ms()));

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            debug!(key, "Evicted expired entry");
        }
        expired
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }
}

impl<V: Clone> UrlCache<V> {
    // == Set ==
    /// Stores `value` under `key` using the instance max age.
    ///
    /// Overwriting keeps the entry count unchanged. Waiters on a pending
    /// marker for the key receive the value in registration order. Returns
    /// the canonical key the value was stored under.
    pub fn set<'k>(&mut self, key: impl Into<UrlKey<'k>>, value: V) -> Result<CanonicalUrl> {
        self.store(key.into(), value, None)
    }

    /// Stores `value` with per-call max age and profile overrides.
    pub fn set_with<'k>(
        &mut self,
        key: impl Into<UrlKey<'k>>,
        value: V,
        call: &CallOptions,
    ) -> Result<CanonicalUrl> {
        self.store(key.into(), value, Some(call))
    }

    fn store(&mut self, key: UrlKey<'_>, value: V, call: Option<&CallOptions>) -> Result<CanonicalUrl> {
        let key = self.canonicalize_with(key, call)?;
        let entry = CacheEntry::new(value, self.options.resolve_max_age(call));

        let delivered = self.pending.resolve(key.as_str(), &entry.value);
        if delivered > 0 {
            debug!(key = %key, waiters = delivered, "Resolved pending key");
        }

        self.entries.insert(key.as_str().to_string(), entry);
        self.stats.set_total_entries(self.entries.len());
        Ok(key)
    }

    // == Wait ==
    /// Returns a waiter for the value of `key`.
    ///
    /// A live value resolves the waiter immediately. Otherwise the waiter is
    /// queued until `set`. Waiting does not claim the fetch; pair it with
    /// [`announce`](UrlCache::announce) to learn who should fetch.
    pub fn wait<'k>(&mut self, key: impl Into<UrlKey<'k>>) -> Result<Waiter<V>> {
        let key = self.canonicalize(key)?;
        self.evict_if_expired(key.as_str());

        if let Some(entry) = self.entries.get(key.as_str()) {
            return Ok(Waiter::resolved(key.as_str(), entry.value.clone()));
        }
        Ok(self.pending.register(key.as_str()))
    }
}

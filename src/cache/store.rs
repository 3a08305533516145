//! Render Cache Store Module
//!
//! Bounded store for rendered HTML keyed by canonical file path, combining
//! LRU eviction, TTL expiry, mtime-based staleness checks and a memory
//! budget over the cached content bytes.

use std::time::Duration;

use lru::LruCache;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{AppError, Result};

// == Render Cache ==
/// Bounded cache of rendered HTML with LRU eviction, TTL expiry and
/// mtime-based invalidation.
///
/// The struct itself is not synchronized; the application wraps it in a
/// single `Arc<RwLock<RenderCache>>` which every operation acquires for
/// its full duration. Internal helpers take `&mut self` and assume that
/// outer lock is held, so no operation ever exposes a torn intermediate
/// state (e.g. the byte counter updated but the entry still present).
/// None of the operations perform I/O; mtime lookups and file reads are
/// the caller's job, outside the lock.
#[derive(Debug)]
pub struct RenderCache {
    /// Keyed storage; least-recently-used order is maintained by the map
    /// itself. Capacity is unbounded here because entry count and memory
    /// budget are enforced by `set`.
    entries: LruCache<String, CacheEntry>,
    /// Hard cap on entry count
    max_entries: usize,
    /// Hard cap on the summed UTF-8 byte length of cached content
    max_memory_bytes: usize,
    /// Running total of cached content bytes, kept exactly in sync with
    /// `entries`
    current_memory_bytes: usize,
    /// Fallback TTL for entries stored without an explicit one
    default_ttl: Duration,
    /// Process-wide toggle: when false, `get` always misses and `set` is a
    /// no-op, but existing entries are kept (a bypass, not a flush)
    enabled: bool,
}

impl RenderCache {
    // == Constructor ==
    /// Creates a new RenderCache.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold
    /// * `default_ttl_secs` - TTL in seconds applied when `set` gets no explicit TTL
    /// * `max_memory_bytes` - Budget for the summed byte length of cached content
    ///
    /// Fails fast on a zero `max_entries` or `max_memory_bytes`.
    pub fn new(max_entries: usize, default_ttl_secs: u64, max_memory_bytes: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(AppError::Config(
                "cache max_entries must be greater than zero".to_string(),
            ));
        }
        if max_memory_bytes == 0 {
            return Err(AppError::Config(
                "cache max_memory_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: LruCache::unbounded(),
            max_entries,
            max_memory_bytes,
            current_memory_bytes: 0,
            default_ttl: Duration::from_secs(default_ttl_secs),
            enabled: true,
        })
    }

    // == Get ==
    /// Retrieves cached HTML for `key` if it is still valid.
    ///
    /// A miss (absent, stale against `current_mtime`, or expired) returns
    /// `None`; it is a normal outcome, never an error. Stale and expired
    /// entries are removed on the spot. A hit promotes the key to
    /// most-recently-used and bumps its access count.
    ///
    /// When the cache is disabled this always misses without touching any
    /// state.
    pub fn get(&mut self, key: &str, current_mtime: Option<f64>) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let (stale, expired) = {
            let entry = self.entries.peek(key)?;
            let stale = current_mtime.is_some_and(|mtime| entry.is_stale(mtime));
            (stale, entry.is_expired())
        };

        if stale || expired {
            self.remove_entry(key);
            return None;
        }

        // get_mut moves the key to the most-recently-used position
        let entry = self.entries.get_mut(key)?;
        entry.touch();
        Some(entry.content().to_string())
    }

    // == Set ==
    /// Stores rendered HTML for `key`, evicting least-recently-used entries
    /// until both the entry cap and the memory budget are satisfied.
    ///
    /// Replacing an existing key removes the old entry (and its bytes)
    /// first, then re-inserts at the most-recently-used position. A single
    /// entry larger than the whole budget is still admitted into an
    /// otherwise-empty cache; the eviction loop stops once there is nothing
    /// left to evict. Never fails, regardless of content size.
    pub fn set(&mut self, key: String, content: String, source_mtime: f64, ttl_secs: Option<u64>) {
        if !self.enabled {
            return;
        }

        let entry_size = content.len();

        // Replace semantics: retire the old entry and its byte accounting
        // before making room for the new one.
        self.remove_entry(&key);

        while self.entries.len() >= self.max_entries
            || self.current_memory_bytes + entry_size > self.max_memory_bytes
        {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.current_memory_bytes -= evicted.size_bytes();
                }
                None => break,
            }
        }

        let ttl = ttl_secs.map_or(self.default_ttl, Duration::from_secs);
        self.entries.put(key, CacheEntry::new(content, source_mtime, ttl));
        self.current_memory_bytes += entry_size;
    }

    // == Invalidate ==
    /// Removes the entry for `key` if present, returning whether one was
    /// removed. Works even while the cache is disabled; explicit
    /// invalidation is housekeeping, not caching behavior.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes every entry and resets the byte accounting. Unconditional.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_memory_bytes = 0;
        tracing::info!("Render cache cleared");
    }

    // == Stats ==
    /// Read-only snapshot of the cache state. The access total is summed
    /// over live entries only; evicted entries lose their contribution.
    pub fn stats(&self) -> CacheStats {
        let total_access_count = self.entries.iter().map(|(_, e)| e.access_count()).sum();
        CacheStats {
            entries: self.entries.len(),
            max_entries: self.max_entries,
            memory_bytes: self.current_memory_bytes,
            max_memory_bytes: self.max_memory_bytes,
            total_access_count,
        }
    }

    // == Enable Toggle ==
    /// Switches the process-wide caching toggle. Disabling bypasses `get`
    /// and `set` without dropping stored entries; re-enabling makes them
    /// usable again (subject to their own TTLs).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether caching is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Length ==
    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internal ==
    /// Removes one entry and its byte accounting as a single step. Assumes
    /// the outer lock is held, like every other method here.
    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.pop(key) {
            Some(entry) => {
                self.current_memory_bytes -= entry.size_bytes();
                true
            }
            None => false,
        }
    }

    /// Recomputed byte total for invariant checks in tests.
    #[cfg(test)]
    pub(crate) fn recounted_memory_bytes(&self) -> usize {
        self.entries.iter().map(|(_, e)| e.size_bytes()).sum()
    }
}

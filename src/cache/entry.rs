//! Cache Entry Module
//!
//! Defines a single cached rendering together with the metadata needed for
//! TTL expiry and mtime-based staleness checks.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached HTML rendering.
///
/// The content is immutable once created; replacing a file's rendering
/// means replacing the whole entry. TTL is fixed at creation and never
/// refreshed on access (this is not a sliding-expiration cache).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Rendered HTML
    content: String,
    /// Creation instant, used for TTL expiry only
    created_at: Instant,
    /// Modification time of the source file when this entry was produced,
    /// in fractional seconds since the Unix epoch
    source_mtime: f64,
    /// Time-to-live, fixed at creation
    ttl: Duration,
    /// Number of successful reads, for reporting only
    access_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry for `content` rendered from a source file whose
    /// modification time was `source_mtime` at render time.
    pub fn new(content: String, source_mtime: f64, ttl: Duration) -> Self {
        Self {
            content,
            created_at: Instant::now(),
            source_mtime,
            ttl,
            access_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL.
    ///
    /// Boundary condition: an entry is expired only when strictly more than
    /// `ttl` has elapsed since creation; an entry queried with zero elapsed
    /// time is always fresh.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    // == Is Stale ==
    /// Checks whether the source file has been modified since this entry
    /// was produced.
    ///
    /// An equal or older mtime is NOT stale; this tolerates filesystems
    /// with coarse mtime resolution and repeated reads of unchanged files.
    pub fn is_stale(&self, current_mtime: f64) -> bool {
        current_mtime > self.source_mtime
    }

    // == Touch ==
    /// Records a successful read. Affects reporting only, never expiry,
    /// staleness, or eviction order.
    pub fn touch(&mut self) {
        self.access_count += 1;
    }

    /// The cached HTML.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// UTF-8 byte length of the cached HTML, as counted against the
    /// cache's memory budget.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    /// Number of successful reads of this entry.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// The source mtime recorded at render time.
    pub fn source_mtime(&self) -> f64 {
        self.source_mtime
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("<p>hi</p>".to_string(), 1000.0, Duration::from_secs(300));

        assert_eq!(entry.content(), "<p>hi</p>");
        assert_eq!(entry.size_bytes(), 9);
        assert_eq!(entry.access_count(), 0);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_fresh_immediately() {
        let entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(1));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(1));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_entry_not_stale_for_equal_mtime() {
        let entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(300));
        assert!(!entry.is_stale(1000.0));
    }

    #[test]
    fn test_entry_not_stale_for_older_mtime() {
        let entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(300));
        assert!(!entry.is_stale(999.5));
    }

    #[test]
    fn test_entry_stale_for_newer_mtime() {
        let entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(300));
        assert!(entry.is_stale(1000.5));
    }

    #[test]
    fn test_entry_touch_increments_access_count() {
        let mut entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(300));

        assert_eq!(entry.access_count(), 0);

        entry.touch();
        assert_eq!(entry.access_count(), 1);

        entry.touch();
        assert_eq!(entry.access_count(), 2);
    }

    #[test]
    fn test_touch_does_not_affect_expiry_or_staleness() {
        let mut entry = CacheEntry::new("content".to_string(), 1000.0, Duration::from_secs(300));

        entry.touch();

        assert!(!entry.is_expired());
        assert!(!entry.is_stale(1000.0));
        assert!(entry.is_stale(1001.0));
    }

    #[test]
    fn test_size_counts_utf8_bytes() {
        let entry = CacheEntry::new("héllo".to_string(), 0.0, Duration::from_secs(300));
        assert_eq!(entry.size_bytes(), 6);
    }
}

//! Cache Statistics Module
//!
//! Read-only snapshot of the render cache state, serialized as-is by the
//! stats endpoint.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the cache taken under the lock.
///
/// `total_access_count` sums the access counters of entries that are alive
/// at snapshot time; it is not a historical counter, so evicted entries no
/// longer contribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// Configured entry cap
    pub max_entries: usize,
    /// Summed UTF-8 byte length of cached content
    pub memory_bytes: usize,
    /// Configured memory budget in bytes
    pub max_memory_bytes: usize,
    /// Sum of live entries' access counters
    pub total_access_count: u64,
}

impl CacheStats {
    /// Memory usage as a fraction of the budget, for log lines.
    pub fn memory_utilization(&self) -> f64 {
        if self.max_memory_bytes == 0 {
            0.0
        } else {
            self.memory_bytes as f64 / self.max_memory_bytes as f64
        }
    }
}

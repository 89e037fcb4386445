//! Measured-cache interface and counters.

use serde::{Deserialize, Serialize};

/// Trait for the object cache whose statistics are recorded
pub trait MeasuredCache: Send + Sync {
    /// Whether the cache backend is connected and healthy
    fn is_ready(&self) -> bool;

    /// Whether the cache can hand out a low-level handle to its store
    fn supports_store_handle(&self) -> bool;

    /// Current runtime counters
    fn stats(&self) -> CacheStats;
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Hit ratio as reported by the cache, `None` when undefined
    pub ratio: Option<f64>,
    pub bytes: u64,
    /// Seconds spent servicing cache operations
    pub time: f64,
    pub calls: u64,
}

impl CacheStats {
    /// Hit ratio computed from raw counts, `None` when there were no lookups.
    pub fn ratio_of(hits: u64, misses: u64) -> Option<f64> {
        let total = hits.checked_add(misses)?;
        if total == 0 {
            None
        } else {
            Some(hits as f64 / total as f64)
        }
    }
}

/// A cache stand-in reporting fixed counters.
#[derive(Debug, Clone)]
pub struct StaticCache {
    stats: CacheStats,
    ready: bool,
    store_handle: bool,
}

impl StaticCache {
    /// A healthy cache reporting `stats`.
    pub fn new(stats: CacheStats) -> Self {
        Self {
            stats,
            ready: true,
            store_handle: true,
        }
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    pub fn with_store_handle(mut self, store_handle: bool) -> Self {
        self.store_handle = store_handle;
        self
    }
}

impl MeasuredCache for StaticCache {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn supports_store_handle(&self) -> bool {
        self.store_handle
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }
}

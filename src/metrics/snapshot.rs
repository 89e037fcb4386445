//! Point-in-time record of the measured cache's counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::cache::CacheStats;

/// Length of the informational snapshot id, in hex characters.
pub const ID_LEN: usize = 12;

/// Decimal places kept for cumulative cache time.
const TIME_PRECISION: f64 = 100_000.0;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One measurement of the measured cache.
///
/// Fields are fixed at construction. `timestamp` is the collection instant in
/// unix seconds and doubles as the member's score in the store; several
/// snapshots may share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    id: String,
    hits: u64,
    misses: u64,
    ratio: Option<f64>,
    bytes: u64,
    time: f64,
    calls: u64,
    timestamp: i64,
}

impl Snapshot {
    /// Builds a snapshot from raw counters taken at `timestamp`.
    ///
    /// `time` is rounded to five decimal places. When the cache did not report
    /// a ratio it is derived from `hits` and `misses`.
    pub fn new(stats: CacheStats, timestamp: i64) -> Self {
        Self {
            id: generate_id(),
            hits: stats.hits,
            misses: stats.misses,
            ratio: stats
                .ratio
                .or_else(|| CacheStats::ratio_of(stats.hits, stats.misses)),
            bytes: stats.bytes,
            time: round_time(stats.time),
            calls: stats.calls,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

fn round_time(time: f64) -> f64 {
    if time.is_finite() {
        (time * TIME_PRECISION).round() / TIME_PRECISION
    } else {
        0.0
    }
}

/// Short opaque id from the clock and a process-wide counter.
///
/// Collisions are tolerated; the id is never used as a lookup key.
fn generate_id() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64;
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mixed = mix64(nanos ^ count.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ std::process::id() as u64);
    let mut id = hex::encode(mixed.to_be_bytes());
    id.truncate(ID_LEN);
    id
}

// splitmix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

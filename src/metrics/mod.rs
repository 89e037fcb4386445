//! Time-ordered recording of object-cache statistics.
//!
//! `CacheMetrics` is the per-process service object. It owns the store handle,
//! the measured cache and the configuration, and exposes:
//! - availability checks (`is_enabled`, `is_active`)
//! - recording (`collect`, `record`, `save`)
//! - windowed reads (`get`)
//! - retention sweeps (`discard`)
//!
//! Every store round-trip runs behind a deadline. Failures are logged and turned
//! into empty results, so metrics never fail the caller.

pub mod cache;
pub mod clock;
pub mod codec;
pub mod snapshot;

mod gate;
mod reader;
mod recorder;
mod sweeper;

pub use cache::{CacheStats, MeasuredCache, StaticCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::Decoded;
pub use snapshot::Snapshot;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tonic::Status;

use crate::config::MetricsConfig;
use crate::error::{Error, Result};
use crate::storage::{SortedSetStore, StoreKey};

/// Name of the metrics series under the cache-wide prefix.
pub const METRICS_KEY: &str = "metrics";

/// Most recent span, in seconds, excluded from reads.
pub const MIN_GRANULARITY: i64 = 60;

pub struct CacheMetrics {
    store: Arc<dyn SortedSetStore>,
    cache: Arc<dyn MeasuredCache>,
    config: MetricsConfig,
    clock: Arc<dyn Clock>,
    key: StoreKey,
}

impl CacheMetrics {
    pub fn new(
        store: Arc<dyn SortedSetStore>,
        cache: Arc<dyn MeasuredCache>,
        config: MetricsConfig,
    ) -> Self {
        let key = StoreKey::new(&config.prefix, METRICS_KEY);
        Self {
            store,
            cache,
            config,
            clock: Arc::new(SystemClock),
            key,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Store key the series lives under.
    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Retention horizon in seconds.
    pub fn max_time(&self) -> i64 {
        self.config.max_time()
    }

    fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Runs one store round-trip under the configured deadline.
    async fn call_store<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, Status>>,
    {
        let deadline = Duration::from_millis(self.config.store_timeout_ms);
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::Timeout(self.config.store_timeout_ms)),
        }
    }
}

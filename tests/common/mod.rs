//! Shared fixtures for cachestats integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cachestats_core::{
    metrics::{CacheMetrics, CacheStats, ManualClock, StaticCache},
    storage::{memory::MemoryStore, ScoredEntry, SortedSetStore, StoreKey},
    MetricsConfig,
};
use tonic::Status;

pub const NOW: i64 = 1_700_000_000;

pub fn stats(hits: u64, misses: u64) -> CacheStats {
    CacheStats {
        hits,
        misses,
        ratio: CacheStats::ratio_of(hits, misses),
        bytes: hits * 512,
        time: 0.0421337,
        calls: hits + misses,
    }
}

/// Service over `store` with a healthy cache and a manual clock set to `NOW`.
pub fn metrics_with(
    store: Arc<dyn SortedSetStore>,
    cache: StaticCache,
    config: MetricsConfig,
) -> (CacheMetrics, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    let metrics = CacheMetrics::new(store, Arc::new(cache), config).with_clock(clock.clone());
    (metrics, clock)
}

pub fn memory_metrics() -> (CacheMetrics, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    let (metrics, clock) = metrics_with(
        store.clone(),
        StaticCache::new(stats(90, 10)),
        MetricsConfig::default(),
    );
    (metrics, store, clock)
}

/// Records one snapshot at `at` and puts the clock back where it was.
pub async fn record_at(metrics: &CacheMetrics, clock: &ManualClock, at: i64) {
    let now = cachestats_core::metrics::Clock::now(clock);
    clock.set(at);
    metrics.record().await;
    clock.set(now);
}

/// Wraps a store and counts every call that reaches it.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SortedSetStore for CountingStore {
    async fn init(&self) -> Result<(), Status> {
        self.inner.init().await
    }

    async fn add_scored(&self, key: &StoreKey, score: i64, payload: Vec<u8>) -> Result<(), Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.add_scored(key, score, payload).await
    }

    async fn range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<Vec<ScoredEntry>, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.range_by_score(key, min, max).await
    }

    async fn remove_range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<u64, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_range_by_score(key, min, max).await
    }
}

/// A store whose every call fails as if the connection dropped.
pub struct FailingStore;

#[async_trait]
impl SortedSetStore for FailingStore {
    async fn init(&self) -> Result<(), Status> {
        Err(Status::unavailable("connection refused"))
    }

    async fn add_scored(&self, _: &StoreKey, _: i64, _: Vec<u8>) -> Result<(), Status> {
        Err(Status::unavailable("connection refused"))
    }

    async fn range_by_score(&self, _: &StoreKey, _: i64, _: i64) -> Result<Vec<ScoredEntry>, Status> {
        Err(Status::unavailable("connection refused"))
    }

    async fn remove_range_by_score(&self, _: &StoreKey, _: i64, _: i64) -> Result<u64, Status> {
        Err(Status::unavailable("connection refused"))
    }
}

/// A store that never answers within any reasonable deadline.
pub struct StalledStore;

#[async_trait]
impl SortedSetStore for StalledStore {
    async fn init(&self) -> Result<(), Status> {
        Ok(())
    }

    async fn add_scored(&self, _: &StoreKey, _: i64, _: Vec<u8>) -> Result<(), Status> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn range_by_score(&self, _: &StoreKey, _: i64, _: i64) -> Result<Vec<ScoredEntry>, Status> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn remove_range_by_score(&self, _: &StoreKey, _: i64, _: i64) -> Result<u64, Status> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(0)
    }
}

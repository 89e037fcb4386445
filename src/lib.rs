//! Time-ordered recording of object-cache runtime statistics.
//!
//! This crate provides:
//! - Periodic snapshots of a measured cache's counters
//! - Storage in a score-ranked sorted set, one member per snapshot
//! - Sliding-window reads that skip foreign payloads
//! - Retention sweeps past a configurable horizon

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;

pub use config::{MetricsConfig, ServiceConfig};
pub use error::{Error, Result};
pub use metrics::{CacheMetrics, CacheStats, MeasuredCache, Snapshot};
pub use storage::{SortedSetStore, StoreBackendType, StoreKey};

//! Score-ranked store backends for time-ordered payloads.
//!
//! This module provides the sorted-set abstraction the metrics layer writes
//! through, plus two implementations:
//! - `memory`: in-process sorted set, for embedding and tests
//! - `duckdb`: persistent sorted set on an embedded DuckDB database
//!
//! Each backend implements the `SortedSetStore` trait. Members are opaque byte
//! payloads ranked by an integer score; duplicate scores and duplicate payloads
//! are kept as distinct members.

pub mod duckdb;
pub mod memory;

use self::{duckdb::DuckDbStore, memory::MemoryStore};

use async_trait::async_trait;
use std::fmt;
use tonic::Status;

use crate::config::StorageConfig;

/// A member returned by a score range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredEntry {
    pub payload: Vec<u8>,
    pub score: i64,
}

/// A namespaced store key of the form `<prefix>:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn new(prefix: &str, name: &str) -> Self {
        let prefix = prefix.trim_end_matches(':');
        if prefix.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}:{}", prefix, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sorted-set store trait.
///
/// Implementations must make each call atomic with respect to concurrent
/// callers; no ordering is guaranteed between separate calls.
#[async_trait]
pub trait SortedSetStore: Send + Sync + 'static {
    /// Initialize the store backend.
    async fn init(&self) -> Result<(), Status>;

    /// Add a member with the given score.
    async fn add_scored(&self, key: &StoreKey, score: i64, payload: Vec<u8>) -> Result<(), Status>;

    /// Members with `min <= score <= max`, ascending by score, ties in insertion order.
    async fn range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<Vec<ScoredEntry>, Status>;

    /// Remove members with `min <= score <= max`, returning how many were removed.
    async fn remove_range_by_score(&self, key: &StoreKey, min: i64, max: i64)
        -> Result<u64, Status>;
}

pub enum StoreBackendType {
    Memory(MemoryStore),
    DuckDb(DuckDbStore),
}

impl StoreBackendType {
    /// Build the backend named by `config.engine`.
    pub fn from_config(config: &StorageConfig) -> Result<Self, Status> {
        match config.engine.as_str() {
            "memory" => Ok(StoreBackendType::Memory(MemoryStore::new())),
            "duckdb" => {
                let store = if config.connection.is_empty() || config.connection == ":memory:" {
                    DuckDbStore::new_in_memory()?
                } else {
                    DuckDbStore::open(&config.connection)?
                };
                Ok(StoreBackendType::DuckDb(store))
            }
            other => Err(Status::invalid_argument(format!(
                "Invalid engine type: {}",
                other
            ))),
        }
    }
}

impl AsRef<dyn SortedSetStore> for StoreBackendType {
    fn as_ref(&self) -> &(dyn SortedSetStore + 'static) {
        match self {
            StoreBackendType::Memory(store) => store,
            StoreBackendType::DuckDb(store) => store,
        }
    }
}

#[async_trait]
impl SortedSetStore for StoreBackendType {
    async fn init(&self) -> Result<(), Status> {
        self.as_ref().init().await
    }

    async fn add_scored(&self, key: &StoreKey, score: i64, payload: Vec<u8>) -> Result<(), Status> {
        self.as_ref().add_scored(key, score, payload).await
    }

    async fn range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<Vec<ScoredEntry>, Status> {
        self.as_ref().range_by_score(key, min, max).await
    }

    async fn remove_range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<u64, Status> {
        self.as_ref().remove_range_by_score(key, min, max).await
    }
}

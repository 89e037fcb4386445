//! DuckDB-backed sorted set.
//!
//! Members live in a single `sorted_set` table shared by every key. A sequence
//! column breaks score ties in insertion order.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tonic::Status;

use super::{ScoredEntry, SortedSetStore, StoreKey};

#[derive(Clone)]
pub struct DuckDbStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbStore {
    /// Opens (or creates) a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Status> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Status::unavailable(format!("Failed to open database: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn new_in_memory() -> Result<Self, Status> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Status::unavailable(format!("Failed to open in-memory database: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl SortedSetStore for DuckDbStore {
    async fn init(&self) -> Result<(), Status> {
        let conn = self.conn.lock().await;
        conn.execute_batch(
            "CREATE SEQUENCE IF NOT EXISTS sorted_set_seq;
            CREATE TABLE IF NOT EXISTS sorted_set (
                key VARCHAR NOT NULL,
                score BIGINT NOT NULL,
                seq BIGINT NOT NULL DEFAULT nextval('sorted_set_seq'),
                payload BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_sorted_set_key_score ON sorted_set(key, score);",
        )
        .map_err(|e| Status::internal(format!("Failed to create table and indexes: {}", e)))
    }

    async fn add_scored(&self, key: &StoreKey, score: i64, payload: Vec<u8>) -> Result<(), Status> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO sorted_set (key, score, payload) VALUES (?1, ?2, ?3)",
            params![key.as_str(), score, payload],
        )
        .map_err(|e| Status::internal(format!("Failed to insert member: {}", e)))?;
        Ok(())
    }

    async fn range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<Vec<ScoredEntry>, Status> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT payload, score
                 FROM sorted_set
                 WHERE key = ?1 AND score >= ?2 AND score <= ?3
                 ORDER BY score ASC, seq ASC",
            )
            .map_err(|e| Status::internal(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![key.as_str(), min, max], |row| {
                Ok(ScoredEntry {
                    payload: row.get(0)?,
                    score: row.get(1)?,
                })
            })
            .map_err(|e| Status::internal(format!("Query execution failed: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| Status::internal(format!("Row mapping failed: {}", e)))?);
        }
        Ok(results)
    }

    async fn remove_range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<u64, Status> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute(
                "DELETE FROM sorted_set WHERE key = ?1 AND score >= ?2 AND score <= ?3",
                params![key.as_str(), min, max],
            )
            .map_err(|e| Status::internal(format!("Failed to delete members: {}", e)))?;
        Ok(removed as u64)
    }
}

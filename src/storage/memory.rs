//! In-process sorted set.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tonic::Status;

use super::{ScoredEntry, SortedSetStore, StoreKey};

/// Members keyed by `(score, seq)` so equal scores keep insertion order.
type Members = BTreeMap<(i64, u64), Vec<u8>>;

#[derive(Default)]
pub struct MemoryStore {
    sets: RwLock<HashMap<StoreKey, Members>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members stored under `key`.
    pub fn len(&self, key: &StoreKey) -> usize {
        self.sets.read().get(key).map_or(0, |members| members.len())
    }

    pub fn is_empty(&self, key: &StoreKey) -> bool {
        self.len(key) == 0
    }
}

#[async_trait]
impl SortedSetStore for MemoryStore {
    async fn init(&self) -> Result<(), Status> {
        Ok(())
    }

    async fn add_scored(&self, key: &StoreKey, score: i64, payload: Vec<u8>) -> Result<(), Status> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.sets
            .write()
            .entry(key.clone())
            .or_default()
            .insert((score, seq), payload);
        Ok(())
    }

    async fn range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<Vec<ScoredEntry>, Status> {
        if min > max {
            return Ok(Vec::new());
        }
        let sets = self.sets.read();
        let Some(members) = sets.get(key) else {
            return Ok(Vec::new());
        };
        Ok(members
            .range((min, 0)..=(max, u64::MAX))
            .map(|(&(score, _), payload)| ScoredEntry {
                payload: payload.clone(),
                score,
            })
            .collect())
    }

    async fn remove_range_by_score(
        &self,
        key: &StoreKey,
        min: i64,
        max: i64,
    ) -> Result<u64, Status> {
        if min > max {
            return Ok(0);
        }
        let mut sets = self.sets.write();
        let Some(members) = sets.get_mut(key) else {
            return Ok(0);
        };
        let doomed: Vec<(i64, u64)> = members
            .range((min, 0)..=(max, u64::MAX))
            .map(|(rank, _)| *rank)
            .collect();
        for rank in &doomed {
            members.remove(rank);
        }
        if members.is_empty() {
            sets.remove(key);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> StoreKey {
        StoreKey::new("test", "metrics")
    }

    #[tokio::test]
    async fn duplicate_scores_are_kept() {
        let store = MemoryStore::new();
        store.add_scored(&key(), 10, b"a".to_vec()).await.unwrap();
        store.add_scored(&key(), 10, b"a".to_vec()).await.unwrap();
        store.add_scored(&key(), 10, b"b".to_vec()).await.unwrap();
        assert_eq!(store.len(&key()), 3);

        let entries = store.range_by_score(&key(), 10, 10).await.unwrap();
        let payloads: Vec<&[u8]> = entries.iter().map(|e| e.payload.as_slice()).collect();
        assert_eq!(payloads, vec![&b"a"[..], &b"a"[..], &b"b"[..]]);
    }

    #[tokio::test]
    async fn range_is_inclusive_and_ordered() {
        let store = MemoryStore::new();
        for score in [30, 10, 20, 40] {
            store.add_scored(&key(), score, vec![score as u8]).await.unwrap();
        }
        let scores: Vec<i64> = store
            .range_by_score(&key(), 10, 30)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.score)
            .collect();
        assert_eq!(scores, vec![10, 20, 30]);
        assert!(store.range_by_score(&key(), 30, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_range_counts_and_isolates_keys() {
        let store = MemoryStore::new();
        let other = StoreKey::new("other", "metrics");
        store.add_scored(&key(), 5, vec![]).await.unwrap();
        store.add_scored(&key(), 15, vec![]).await.unwrap();
        store.add_scored(&other, 5, vec![]).await.unwrap();

        assert_eq!(store.remove_range_by_score(&key(), 0, 10).await.unwrap(), 1);
        assert_eq!(store.remove_range_by_score(&key(), 0, 10).await.unwrap(), 0);
        assert_eq!(store.len(&key()), 1);
        assert_eq!(store.len(&other), 1);
    }
}

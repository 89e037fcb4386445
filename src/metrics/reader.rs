use tracing::{debug, warn};

use super::codec::{self, Decoded};
use super::{CacheMetrics, Snapshot, MIN_GRANULARITY};

impl CacheMetrics {
    /// Snapshots from the last `seconds` (default: the retention horizon),
    /// oldest first.
    ///
    /// The most recent minute is left out so partially filled windows are not
    /// reported. Payloads in a foreign format are skipped; store failures yield
    /// an empty result.
    pub async fn get(&self, seconds: Option<u64>) -> Vec<Snapshot> {
        if !self.is_active() {
            debug!("metrics inactive, skipping get");
            return Vec::new();
        }

        let seconds = seconds
            .map(|s| i64::try_from(s).unwrap_or(i64::MAX))
            .unwrap_or_else(|| self.max_time());
        let now = self.now();
        let min = now.saturating_sub(seconds);
        let max = now - MIN_GRANULARITY;
        if min > max {
            return Vec::new();
        }

        let entries = match self
            .call_store(self.store.range_by_score(&self.key, min, max))
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, "Failed to read snapshots: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match codec::decode(&entry.payload) {
                Decoded::Native(snapshot) => Some(snapshot),
                Decoded::Foreign => None,
                Decoded::Malformed(reason) => {
                    debug!(score = entry.score, "Skipping malformed snapshot: {}", reason);
                    None
                }
            })
            .collect()
    }
}

use tracing::{debug, warn};

use super::CacheMetrics;

impl CacheMetrics {
    /// Deletes every snapshot at or before `now - max_time()`.
    ///
    /// Idempotent. Returns the number of members removed, zero when inactive
    /// or when the store call fails.
    pub async fn discard(&self) -> u64 {
        if !self.is_active() {
            debug!("metrics inactive, skipping discard");
            return 0;
        }

        let horizon = self.now() - self.max_time();
        match self
            .call_store(self.store.remove_range_by_score(&self.key, 0, horizon))
            .await
        {
            Ok(removed) => {
                debug!(key = %self.key, horizon, removed, "discarded expired snapshots");
                removed
            }
            Err(e) => {
                warn!(key = %self.key, "Failed to discard snapshots: {}", e);
                0
            }
        }
    }
}

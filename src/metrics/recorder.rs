use tracing::{debug, warn};

use super::{codec, CacheMetrics, Snapshot};

impl CacheMetrics {
    /// Pulls the measured cache's counters into a snapshot stamped now.
    pub fn collect(&self) -> Snapshot {
        Snapshot::new(self.cache.stats(), self.now())
    }

    /// Collects and saves one snapshot. Does nothing while inactive.
    ///
    /// Costs a single store write, so hosts can call it once per unit of work.
    pub async fn record(&self) {
        if !self.is_active() {
            debug!("metrics inactive, skipping record");
            return;
        }
        let snapshot = self.collect();
        self.save(&snapshot).await;
    }

    /// Appends `snapshot` to the series, scored by its timestamp.
    ///
    /// Store failures are logged and dropped.
    pub async fn save(&self, snapshot: &Snapshot) {
        if !self.is_active() {
            debug!("metrics inactive, skipping save");
            return;
        }
        let payload = match codec::encode(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(id = snapshot.id(), "Failed to encode snapshot: {}", e);
                return;
            }
        };
        let write = self
            .store
            .add_scored(&self.key, snapshot.timestamp(), payload);
        if let Err(e) = self.call_store(write).await {
            warn!(key = %self.key, "Failed to save snapshot: {}", e);
        }
    }
}

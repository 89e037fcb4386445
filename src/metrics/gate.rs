use super::CacheMetrics;

impl CacheMetrics {
    /// Whether metrics are switched on in configuration.
    pub fn is_enabled(&self) -> bool {
        !self.config.disabled
    }

    /// Whether recording and reading may touch the store right now.
    ///
    /// Re-evaluated on every call; requires metrics to be enabled and the
    /// measured cache to be healthy and able to expose its store.
    pub fn is_active(&self) -> bool {
        self.is_enabled() && self.cache.is_ready() && self.cache.supports_store_handle()
    }
}

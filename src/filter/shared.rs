use std::sync::Arc;

use arc_swap::ArcSwap;

use super::FilterConfig;

// Whole-config snapshots swapped atomically, so the processing thread never
// observes a half-written flag set. Load once per block; the snapshot is
// stable for the duration of that block.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<FilterConfig>>,
}

impl SharedConfig {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(config))),
        }
    }

    pub fn load(&self) -> Arc<FilterConfig> {
        self.inner.load_full()
    }

    pub fn store(&self, config: FilterConfig) {
        self.inner.store(Arc::new(config));
    }

    // Single control-side writer assumed; concurrent writers would race the
    // load/store pair.
    pub fn update(&self, callback: impl FnOnce(&mut FilterConfig)) {
        let mut config = *self.inner.load_full();
        callback(&mut config);
        self.inner.store(Arc::new(config));
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

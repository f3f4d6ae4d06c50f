//! L1 Adaptive Cache: size-weighted eviction with TTL, on top of `moka`'s
//! synchronous cache (spec.md §5: no cooperative async in the core).

use std::sync::Arc;

use moka::sync::Cache;
use prometheus::Registry;

use crate::features::cache::{config::AdaptiveCacheConfig, metrics::AdaptiveCacheMetrics, CacheKey};

/// Implemented by anything storable in the weighted L1 tier so eviction can
/// account for actual memory footprint rather than entry count alone.
pub trait EstimateSize {
    fn estimated_size_bytes(&self) -> usize;
}

pub struct AdaptiveCache<T: EstimateSize + Send + Sync + 'static> {
    cache: Cache<CacheKey, Arc<T>>,
    metrics: Arc<AdaptiveCacheMetrics>,
}

impl<T: EstimateSize + Send + Sync + 'static> AdaptiveCache<T> {
    pub fn new(config: AdaptiveCacheConfig, registry: &Registry) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .weigher(|_key: &CacheKey, value: &Arc<T>| {
                (value.estimated_size_bytes() / (1024 * 1024)).max(1) as u32
            })
            .time_to_live(config.ttl)
            .build();

        Self { cache, metrics: Arc::new(AdaptiveCacheMetrics::new(registry)) }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<T>> {
        let result = self.cache.get(key);
        if result.is_some() {
            self.metrics.hits.inc();
        } else {
            self.metrics.misses.inc();
        }
        self.refresh_gauges();
        result
    }

    pub fn insert(&self, key: CacheKey, value: Arc<T>) {
        self.cache.insert(key, value);
        self.refresh_gauges();
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key);
        self.refresh_gauges();
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
        self.metrics.entries.set(0);
        self.metrics.bytes.set(0);
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn weighted_size_mb(&self) -> u64 {
        self.cache.weighted_size()
    }

    pub fn hit_rate(&self) -> f64 {
        self.metrics.hit_rate()
    }

    pub fn metrics(&self) -> Arc<AdaptiveCacheMetrics> {
        Arc::clone(&self.metrics)
    }

    fn refresh_gauges(&self) {
        self.cache.run_pending_tasks();
        self.metrics.entries.set(self.cache.entry_count() as i64);
        self.metrics.bytes.set(self.cache.weighted_size() as i64 * 1024 * 1024);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cache::{FileId, Fingerprint};
    use crate::shared::ports::Language;

    #[derive(Debug, Clone)]
    struct TestIrDocument {
        content: String,
        size: usize,
    }

    impl EstimateSize for TestIrDocument {
        fn estimated_size_bytes(&self) -> usize {
            self.size
        }
    }

    fn key(path: &str, content: &str) -> CacheKey {
        CacheKey::new(FileId::from_path_str(path, Language::Python), Fingerprint::compute(content.as_bytes()))
    }

    #[test]
    fn adaptive_cache_basic_roundtrip() {
        let registry = Registry::new();
        let cache = AdaptiveCache::new(AdaptiveCacheConfig::default(), &registry);

        let k = key("a.py", "code");
        let ir = Arc::new(TestIrDocument { content: "code".to_string(), size: 1024 });
        cache.insert(k.clone(), Arc::clone(&ir));

        let result = cache.get(&k);
        assert!(result.is_some());
        assert_eq!(result.unwrap().content, "code");
    }

    #[test]
    fn adaptive_cache_hit_miss_rate() {
        let registry = Registry::new();
        let cache = AdaptiveCache::new(AdaptiveCacheConfig::default(), &registry);

        let k1 = key("a.py", "code1");
        cache.insert(k1.clone(), Arc::new(TestIrDocument { content: "code1".into(), size: 1024 }));
        cache.get(&k1);

        let k2 = key("b.py", "code2");
        cache.get(&k2);

        assert_eq!(cache.metrics.hits.get(), 1);
        assert_eq!(cache.metrics.misses.get(), 1);
        assert!((cache.hit_rate() - 0.5).abs() < 0.01);
    }

    #[test]
    fn adaptive_cache_clear_empties_tier() {
        let registry = Registry::new();
        let cache = AdaptiveCache::new(AdaptiveCacheConfig::default(), &registry);

        let k = key("a.py", "code");
        cache.insert(k, Arc::new(TestIrDocument { content: "code".into(), size: 1024 }));
        cache.refresh_gauges();
        assert!(cache.entry_count() > 0);

        cache.clear();
        assert_eq!(cache.entry_count(), 0);
    }
}

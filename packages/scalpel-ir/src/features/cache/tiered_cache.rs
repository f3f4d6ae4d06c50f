//! Tiered Cache: L0 -> L1 -> L2 facade with promotion (spec.md §4.7).
//!
//! Read: L0 -> L1 -> L2 -> miss. A hit at L1 backfills L0; a hit at L2
//! backfills both L1 and L0. Write: synchronous to all three tiers — the
//! core has no background task runtime to hand L2 writes off to.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use prometheus::Registry;
use serde::{de::DeserializeOwned, Serialize};

use crate::features::cache::{
    config::TieredCacheConfig, l1_adaptive_cache::EstimateSize, metrics::TieredCacheMetrics,
    AdaptiveCache, CacheKey, CacheResult, DiskCache, FileId, FileMetadata, SessionCache,
};

pub struct TieredCache<T: EstimateSize + Send + Sync + 'static> {
    pub l0: SessionCache<T>,
    pub l1: AdaptiveCache<T>,
    pub l2: DiskCache,
    metrics: Arc<TieredCacheMetrics>,
}

impl<T> TieredCache<T>
where
    T: EstimateSize + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(config: TieredCacheConfig, registry: &Registry) -> CacheResult<Self> {
        let l0 = SessionCache::new(config.l0.clone(), registry);
        let l1 = AdaptiveCache::new(config.l1.clone(), registry);
        let l2 = DiskCache::new_with_registry(config.l2.clone(), registry)?;

        Ok(Self { l0, l1, l2, metrics: Arc::new(TieredCacheMetrics::new(registry)) })
    }

    pub fn get(&self, key: &CacheKey, metadata: &FileMetadata) -> CacheResult<Option<Arc<T>>> {
        let start = Instant::now();

        if let Some(value) = self.l0.check_fast_path(&key.file_id, metadata.mtime_ns, metadata.size_bytes) {
            self.metrics.l0_hits.inc();
            self.metrics.total_latency.observe(start.elapsed().as_secs_f64());
            return Ok(Some(value));
        }
        if let Some(value) = self.l0.get(key) {
            self.metrics.l0_hits.inc();
            self.metrics.total_latency.observe(start.elapsed().as_secs_f64());
            return Ok(Some(value));
        }
        if let Some(value) = self.l1.get(key) {
            let size_bytes = value.estimated_size_bytes();
            self.l0.insert(key.clone(), value.clone(), metadata.clone(), size_bytes);
            self.metrics.l1_hits.inc();
            self.metrics.total_latency.observe(start.elapsed().as_secs_f64());
            return Ok(Some(value));
        }
        if let Some(value) = self.l2.get::<T>(key)? {
            let size_bytes = value.estimated_size_bytes();
            self.l1.insert(key.clone(), value.clone());
            self.l0.insert(key.clone(), value.clone(), metadata.clone(), size_bytes);
            self.metrics.l2_hits.inc();
            self.metrics.total_latency.observe(start.elapsed().as_secs_f64());
            return Ok(Some(value));
        }

        self.metrics.misses.inc();
        self.metrics.total_latency.observe(start.elapsed().as_secs_f64());
        Ok(None)
    }

    pub fn set(&self, key: &CacheKey, value: Arc<T>, metadata: &FileMetadata) -> CacheResult<()> {
        let size_bytes = value.estimated_size_bytes();
        self.l0.insert(key.clone(), value.clone(), metadata.clone(), size_bytes);
        self.l1.insert(key.clone(), value.clone());
        self.l2.set(key, &*value)?;
        Ok(())
    }

    pub fn invalidate(&self, key: &CacheKey) -> CacheResult<()> {
        self.l0.invalidate(&key.file_id);
        self.l1.invalidate(key);
        self.l2.invalidate(key)?;
        Ok(())
    }

    pub fn clear(&self) -> CacheResult<()> {
        self.l0.clear();
        self.l1.clear();
        self.l2.clear()?;
        Ok(())
    }

    pub fn hit_rate(&self) -> f64 {
        self.metrics.overall_hit_rate()
    }

    pub fn purge_orphans(&self, current_files: &HashSet<FileId>) {
        self.l0.purge_orphans(current_files);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cache::config::{AdaptiveCacheConfig, DiskCacheConfig, SessionCacheConfig};
    use crate::features::cache::Fingerprint;
    use crate::shared::ports::Language;
    use serde::Deserialize;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: u64,
        value: String,
    }

    impl EstimateSize for TestData {
        fn estimated_size_bytes(&self) -> usize {
            std::mem::size_of::<Self>() + self.value.len()
        }
    }

    fn temp_config() -> (TieredCacheConfig, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = TieredCacheConfig {
            l0: SessionCacheConfig { max_entries: 100, enable_bloom_filter: true, bloom_capacity: 1000, bloom_fp_rate: 0.01 },
            l1: AdaptiveCacheConfig { max_entries: 50, max_bytes: 10 * 1024 * 1024, ttl: Duration::from_secs(3600), enable_eviction_listener: false },
            l2: DiskCacheConfig { cache_dir: temp_dir.path().to_path_buf(), enable_compression: false },
        };
        (config, temp_dir)
    }

    #[test]
    fn tiered_cache_l0_hit_after_set() {
        let (config, _temp) = temp_config();
        let registry = Registry::new();
        let cache: TieredCache<TestData> = TieredCache::new(config, &registry).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let metadata = FileMetadata { mtime_ns: 123456789, size_bytes: 1024, fingerprint: Fingerprint::compute(b"test") };
        let data = Arc::new(TestData { id: 42, value: "hello".into() });

        cache.set(&key, data.clone(), &metadata).unwrap();

        let retrieved = cache.get(&key, &metadata).unwrap().unwrap();
        assert_eq!(*retrieved, *data);
        assert_eq!(cache.metrics.l0_hits.get(), 1);
    }

    #[test]
    fn tiered_cache_promotes_l2_hit_to_l0_and_l1() {
        let (config, _temp) = temp_config();
        let registry = Registry::new();
        let cache: TieredCache<TestData> = TieredCache::new(config, &registry).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let metadata = FileMetadata { mtime_ns: 123456789, size_bytes: 1024, fingerprint: Fingerprint::compute(b"test") };
        let data = Arc::new(TestData { id: 1, value: "data".into() });

        cache.l2.set(&key, &*data).unwrap();

        let retrieved = cache.get(&key, &metadata).unwrap().unwrap();
        assert_eq!(*retrieved, *data);
        assert_eq!(cache.metrics.l2_hits.get(), 1);

        let retrieved2 = cache.get(&key, &metadata).unwrap().unwrap();
        assert_eq!(*retrieved2, *data);
        assert_eq!(cache.metrics.l0_hits.get(), 1);
    }

    #[test]
    fn tiered_cache_invalidate_clears_every_tier() {
        let (config, _temp) = temp_config();
        let registry = Registry::new();
        let cache: TieredCache<TestData> = TieredCache::new(config, &registry).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let metadata = FileMetadata { mtime_ns: 123456789, size_bytes: 1024, fingerprint: Fingerprint::compute(b"test") };
        let data = Arc::new(TestData { id: 1, value: "data".into() });

        cache.set(&key, data, &metadata).unwrap();
        cache.invalidate(&key).unwrap();

        let result = cache.get(&key, &metadata).unwrap();
        assert!(result.is_none());
        assert_eq!(cache.metrics.misses.get(), 1);
    }

    #[test]
    fn tiered_cache_hit_rate_tracks_overall_lookups() {
        let (config, _temp) = temp_config();
        let registry = Registry::new();
        let cache: TieredCache<TestData> = TieredCache::new(config, &registry).unwrap();

        let key1 = CacheKey::from_file_id(FileId::from_path_str("test1.py", Language::Python));
        let key2 = CacheKey::from_file_id(FileId::from_path_str("test2.py", Language::Python));
        let metadata = FileMetadata { mtime_ns: 111111, size_bytes: 512, fingerprint: Fingerprint::compute(b"test") };
        let data = Arc::new(TestData { id: 1, value: "data".into() });

        cache.set(&key1, data, &metadata).unwrap();
        cache.get(&key1, &metadata).unwrap();
        cache.get(&key1, &metadata).unwrap();
        cache.get(&key2, &metadata).unwrap();

        assert!((cache.hit_rate() - 0.666).abs() < 0.01);
    }
}

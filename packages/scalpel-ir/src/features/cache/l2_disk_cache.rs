//! L2 Disk Cache: persistent storage under `.scalpel_cache/{prefix}/{key}`
//! (spec.md §4.7).
//!
//! File layout: 2-byte magic `b"CS"`, 1-byte format version, then a
//! `serde_json`-encoded payload. The magic/version header lets `get` reject
//! a stale or foreign file cheaply, without deserializing it, and lets a
//! future format bump coexist with old cache directories (old files just
//! fail the version check and are treated as a miss).

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use prometheus::Registry;
use serde::{de::DeserializeOwned, Serialize};

use crate::features::cache::{config::DiskCacheConfig, metrics::DiskCacheMetrics, CacheError, CacheKey, CacheResult};

const MAGIC: &[u8; 2] = b"CS";
const FORMAT_VERSION: u8 = 1;

/// L2 Disk Cache.
pub struct DiskCache {
    pub(crate) config: DiskCacheConfig,
    pub(crate) metrics: Arc<DiskCacheMetrics>,
    /// Key -> file path index, rebuilt by scanning on startup.
    pub(crate) index: DashMap<CacheKey, PathBuf>,
}

impl DiskCache {
    pub fn new(config: DiskCacheConfig) -> CacheResult<Self> {
        let registry = Registry::new();
        Self::new_with_registry(config, &registry)
    }

    pub fn new_with_registry(config: DiskCacheConfig, registry: &Registry) -> CacheResult<Self> {
        fs::create_dir_all(&config.cache_dir)?;

        Ok(Self {
            config,
            metrics: Arc::new(DiskCacheMetrics::new(registry)),
            index: DashMap::new(),
        })
    }

    fn key_to_path(&self, key: &CacheKey) -> PathBuf {
        let hash = blake3::hash(&key.as_bytes());
        self.config.cache_dir.join(format!("{}.cache", &hash.to_hex()[..32]))
    }

    pub fn get<T>(&self, key: &CacheKey) -> CacheResult<Option<Arc<T>>>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let path = self.index.get(key).map(|p| p.clone()).unwrap_or_else(|| self.key_to_path(key));

        if !path.exists() {
            self.metrics.misses.inc();
            return Ok(None);
        }

        // spec.md §4.7: "any deserialization failure of a disk entry is
        // treated as a miss; the corrupt file is removed" — bad magic,
        // version mismatch, and payload deserialization failures all take
        // this path rather than propagating as an error. Only genuine I/O
        // faults (missing permissions, disk errors) surface as `Err`.
        let mut file = File::open(&path)?;
        let mut header = [0u8; 3];
        let corrupt = if file.read_exact(&mut header).is_err() {
            true
        } else if &header[0..2] != MAGIC || header[2] != FORMAT_VERSION {
            true
        } else {
            let mut rest = Vec::new();
            match file.read_to_end(&mut rest) {
                Ok(_) => match serde_json::from_slice::<T>(&rest) {
                    Ok(value) => {
                        self.index.insert(key.clone(), path);
                        self.metrics.hits.inc();
                        self.metrics.read_latency.observe(start.elapsed().as_secs_f64());
                        return Ok(Some(Arc::new(value)));
                    }
                    Err(_) => true,
                },
                Err(_) => true,
            }
        };

        debug_assert!(corrupt);
        self.metrics.corrupted.inc();
        self.index.remove(key);
        let _ = fs::remove_file(&path);
        tracing::warn!(path = %path.display(), "disk cache entry corrupted, treating as miss and removing");
        Ok(None)
    }

    pub fn set<T>(&self, key: &CacheKey, value: &T) -> CacheResult<()>
    where
        T: Serialize,
    {
        let start = Instant::now();
        let path = self.key_to_path(key);
        let payload = serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let tmp_path = path.with_extension("tmp");
        {
            let mut file = OpenOptions::new().create(true).write(true).truncate(true).open(&tmp_path)?;
            file.write_all(MAGIC)?;
            file.write_all(&[FORMAT_VERSION])?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        self.index.insert(key.clone(), path);
        self.metrics.writes.inc();
        self.metrics.write_latency.observe(start.elapsed().as_secs_f64());
        Ok(())
    }

    pub fn invalidate(&self, key: &CacheKey) -> CacheResult<()> {
        let path = self.index.remove(key).map(|(_, p)| p).unwrap_or_else(|| self.key_to_path(key));
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> CacheResult<()> {
        self.index.clear();
        if self.config.cache_dir.exists() {
            fs::remove_dir_all(&self.config.cache_dir)?;
            fs::create_dir_all(&self.config.cache_dir)?;
        }
        Ok(())
    }
}

impl Clone for DiskCache {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            index: self.index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cache::{FileId, Language};
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: u64,
        name: String,
        values: Vec<i32>,
    }

    fn temp_config() -> (DiskCacheConfig, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        (
            DiskCacheConfig { cache_dir: temp_dir.path().to_path_buf(), enable_compression: false },
            temp_dir,
        )
    }

    #[test]
    fn disk_cache_roundtrip() {
        let (config, _temp) = temp_config();
        let cache = DiskCache::new(config).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let data = TestData { id: 42, name: "test".into(), values: vec![1, 2, 3] };

        cache.set(&key, &data).unwrap();
        let retrieved: Arc<TestData> = cache.get(&key).unwrap().unwrap();
        assert_eq!(*retrieved, data);
    }

    #[test]
    fn disk_cache_atomic_write_leaves_no_tmp_files() {
        let (config, temp) = temp_config();
        let cache = DiskCache::new(config).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        cache.set(&key, &TestData { id: 1, name: "v1".into(), values: vec![1] }).unwrap();
        cache.set(&key, &TestData { id: 2, name: "v2".into(), values: vec![1, 2] }).unwrap();

        let retrieved: Arc<TestData> = cache.get(&key).unwrap().unwrap();
        assert_eq!(retrieved.id, 2);

        let tmp_files: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension() == Some(std::ffi::OsStr::new("tmp")))
            .collect();
        assert_eq!(tmp_files.len(), 0);
    }

    #[test]
    fn disk_cache_invalidate_and_clear() {
        let (config, _temp) = temp_config();
        let cache = DiskCache::new(config).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let data = TestData { id: 1, name: "test".into(), values: vec![] };
        cache.set(&key, &data).unwrap();
        assert!(cache.get::<TestData>(&key).unwrap().is_some());

        cache.invalidate(&key).unwrap();
        assert!(cache.get::<TestData>(&key).unwrap().is_none());

        cache.set(&key, &data).unwrap();
        cache.clear().unwrap();
        assert!(cache.get::<TestData>(&key).unwrap().is_none());
    }

    #[test]
    fn disk_cache_treats_bad_magic_as_a_miss_and_removes_the_file() {
        let (config, temp) = temp_config();
        let cache = DiskCache::new(config).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let path = cache.key_to_path(&key);
        fs::write(&path, b"not a cache file at all").unwrap();

        let result = cache.get::<TestData>(&key).unwrap();
        assert!(result.is_none());
        assert!(!path.exists());
        let _ = temp;
    }

    #[test]
    fn disk_cache_treats_a_version_mismatch_as_a_miss() {
        let (config, temp) = temp_config();
        let cache = DiskCache::new(config).unwrap();

        let key = CacheKey::from_file_id(FileId::from_path_str("test.py", Language::Python));
        let path = cache.key_to_path(&key);
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION + 1);
        bytes.extend_from_slice(b"{}");
        fs::write(&path, bytes).unwrap();

        let result = cache.get::<TestData>(&key).unwrap();
        assert!(result.is_none());
        let _ = temp;
    }
}

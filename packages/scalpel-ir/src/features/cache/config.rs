//! Tunables for each cache tier (spec.md §4.7).

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SessionCacheConfig {
    pub max_entries: usize,
    pub enable_bloom_filter: bool,
    pub bloom_capacity: usize,
    pub bloom_fp_rate: f64,
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enable_bloom_filter: true,
            bloom_capacity: 10_000,
            bloom_fp_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveCacheConfig {
    pub max_entries: u64,
    pub max_bytes: u64,
    pub ttl: Duration,
    pub enable_eviction_listener: bool,
}

impl Default for AdaptiveCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 5_000,
            max_bytes: 256 * 1024 * 1024,
            ttl: Duration::from_secs(3600),
            enable_eviction_listener: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiskCacheConfig {
    pub cache_dir: PathBuf,
    pub enable_compression: bool,
}

impl Default for DiskCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".scalpel_cache"),
            enable_compression: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TieredCacheConfig {
    pub l0: SessionCacheConfig,
    pub l1: AdaptiveCacheConfig,
    pub l2: DiskCacheConfig,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            l0: SessionCacheConfig::default(),
            l1: AdaptiveCacheConfig::default(),
            l2: DiskCacheConfig::default(),
        }
    }
}

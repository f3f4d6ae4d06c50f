//! Multi-tier analysis cache (spec.md §4.7: C7 Analysis Cache).
//!
//! - L0 (session): lock-free `DashMap` + Blake3 fingerprint + bloom filter.
//! - L1 (adaptive): `moka`, weighted size + TTL eviction.
//! - L2 (disk): `.scalpel_cache/` files with a `CS` magic header.
//!
//! The cache key for an analysis result combines the analysis kind, the
//! input content, the canonicalized options, and the tool version — see
//! [`types::AnalysisCacheKey`].

mod bloom;
mod error;
mod fingerprint;
mod metrics;
mod types;

pub mod config;
mod dependency_graph;
mod l0_session_cache;
mod l1_adaptive_cache;
mod l2_disk_cache;
mod tiered_cache;

pub use bloom::BloomFilter;
pub use error::*;
pub use fingerprint::*;
pub use types::*;

pub use config::*;
pub use dependency_graph::DependencyGraph;
pub use l0_session_cache::SessionCache;
pub use l1_adaptive_cache::{AdaptiveCache, EstimateSize};
pub use l2_disk_cache::DiskCache;
pub use tiered_cache::TieredCache;

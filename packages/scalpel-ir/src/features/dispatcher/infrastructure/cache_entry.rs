//! Adapts an arbitrary tool result into something [`TieredCache`] can size
//! and store (spec.md §4.7/§4.9: dispatcher results are cacheable like any
//! other analysis output).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::cache::EstimateSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeCacheEntry(pub Value);

impl EstimateSize for EnvelopeCacheEntry {
    fn estimated_size_bytes(&self) -> usize {
        serde_json::to_vec(&self.0).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

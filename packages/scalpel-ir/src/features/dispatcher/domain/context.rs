//! The handler-visible call context (spec.md §4.9: `Context { tier,
//! limits, cache, policy, audit_sink }`).

use std::sync::Arc;

use crate::features::cache::TieredCache;
use crate::features::dispatcher::infrastructure::cache_entry::EnvelopeCacheEntry;
use crate::features::policy::domain::{PolicyDocument, Tier};
use crate::features::policy::EffectiveOptions;

use super::audit::AuditSink;

pub struct Context {
    pub tier: Tier,
    pub limits: EffectiveOptions,
    pub cache: Option<Arc<TieredCache<EnvelopeCacheEntry>>>,
    pub policy: Option<PolicyDocument>,
    pub audit_sink: Arc<dyn AuditSink>,
}

//! Policy & tier gate (spec.md §4.8: C8) — the capability/limit table,
//! request clamping, and policy-document signature verification.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{evaluate, resolve_tier_from_env, EffectiveOptions, RequestedOptions, ResolvedPolicy};
pub use domain::{PolicyDocument, Tier, TierCaps};

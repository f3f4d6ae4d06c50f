//! Domain types for the policy & tier gate (spec.md §4.8: C8).

pub mod policy_document;
pub mod tier;

pub use policy_document::{Capabilities, PolicyDocument};
pub use tier::{Limit, Tier, TierCaps};

pub mod evaluate_request;
pub mod load_policy;

pub use evaluate_request::{evaluate, EffectiveOptions, RequestedOptions};
pub use load_policy::{resolve_tier_from_env, ResolvedPolicy};

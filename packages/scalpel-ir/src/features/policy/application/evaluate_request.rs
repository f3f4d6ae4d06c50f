//! Request evaluation against the active tier (spec.md §4.8, property P6:
//! `limits_applied ≤ tier_caps` pointwise, and flags the tier forbids never
//! survive into the effective options).

use serde::{Deserialize, Serialize};

use crate::features::policy::domain::tier::Limit;
use crate::features::policy::domain::Tier;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestedOptions {
    pub max_findings: Option<u64>,
    pub max_taint_depth: Option<u64>,
    pub max_modules: Option<u64>,
    pub cross_file_scan: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveOptions {
    pub tier_applied: Tier,
    pub max_findings: Limit,
    pub max_taint_depth: Limit,
    pub max_modules: Limit,
    pub confidence_scoring: bool,
    pub sanitizer_recognition: bool,
    pub cross_file_scan: bool,
    pub audit_logging: bool,
    /// Feature flags the request asked for but the tier does not grant;
    /// surfaced to the caller as a diagnostic, not an error.
    pub stripped_flags: Vec<&'static str>,
}

pub fn evaluate(tier: Tier, requested: &RequestedOptions) -> EffectiveOptions {
    let caps = tier.caps();
    let mut stripped_flags = Vec::new();

    let cross_file_scan = if requested.cross_file_scan && !caps.cross_file_scan {
        stripped_flags.push("cross_file_scan");
        false
    } else {
        requested.cross_file_scan
    };

    EffectiveOptions {
        tier_applied: tier,
        max_findings: clamp(requested.max_findings, caps.max_findings),
        max_taint_depth: clamp(requested.max_taint_depth, caps.max_taint_depth),
        max_modules: clamp(requested.max_modules, caps.max_modules),
        confidence_scoring: caps.confidence_scoring,
        sanitizer_recognition: caps.sanitizer_recognition,
        cross_file_scan,
        audit_logging: caps.audit_logging,
        stripped_flags,
    }
}

fn clamp(requested: Option<u64>, cap: Limit) -> Limit {
    match (requested, cap) {
        (None, cap) => cap,
        (Some(r), None) => Some(r),
        (Some(r), Some(c)) => Some(r.min(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_clamps_a_larger_request_down_to_its_cap() {
        let requested = RequestedOptions { max_findings: Some(10_000), ..Default::default() };
        let effective = evaluate(Tier::Community, &requested);
        assert_eq!(effective.max_findings, Some(50));
    }

    #[test]
    fn community_strips_cross_file_scan_and_reports_it() {
        let requested = RequestedOptions { cross_file_scan: true, ..Default::default() };
        let effective = evaluate(Tier::Community, &requested);
        assert!(!effective.cross_file_scan);
        assert_eq!(effective.stripped_flags, vec!["cross_file_scan"]);
    }

    #[test]
    fn enterprise_leaves_an_unlimited_request_unlimited() {
        let requested = RequestedOptions { max_taint_depth: None, ..Default::default() };
        let effective = evaluate(Tier::Enterprise, &requested);
        assert_eq!(effective.max_taint_depth, None);
    }

    #[test]
    fn a_smaller_request_than_the_cap_is_left_untouched() {
        let requested = RequestedOptions { max_findings: Some(5), ..Default::default() };
        let effective = evaluate(Tier::Community, &requested);
        assert_eq!(effective.max_findings, Some(5));
    }
}

//! Loads the active tier and policy document from the environment
//! (spec.md §6: `CS_TIER`, `CS_LICENSE_PATH`, `CS_POLICY_PATH`).
//!
//! Fail-closed: any missing file, parse failure, or unverifiable signature
//! falls back to [`Tier::Community`] rather than erroring the request.

use std::path::Path;

use crate::features::policy::domain::{PolicyDocument, Tier};
use crate::features::policy::infrastructure::signature;

pub struct ResolvedPolicy {
    pub tier: Tier,
    pub document: Option<PolicyDocument>,
}

pub fn resolve_tier_from_env(
    cs_tier: Option<&str>,
    cs_license_path: Option<&Path>,
    cs_policy_path: Option<&Path>,
    public_key: &[u8],
) -> ResolvedPolicy {
    if let Some(forced) = cs_tier.and_then(Tier::parse) {
        return ResolvedPolicy { tier: forced, document: None };
    }

    let document = cs_license_path
        .or(cs_policy_path)
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|text| parse_document(&text));

    let Some(document) = document else {
        tracing::warn!("no policy document resolved, failing closed to community tier");
        return ResolvedPolicy { tier: Tier::default(), document: None };
    };

    let Some(tier) = Tier::parse(&document.tier_name) else {
        tracing::warn!(tier_name = %document.tier_name, "unrecognized tier name, failing closed to community tier");
        return ResolvedPolicy { tier: Tier::default(), document: None };
    };

    if tier.caps().policy_signing_required && !signature::verify(&document, public_key) {
        tracing::warn!(tier = ?tier, "policy signature verification failed, failing closed to community tier");
        return ResolvedPolicy { tier: Tier::default(), document: Some(document) };
    }

    ResolvedPolicy { tier, document: Some(document) }
}

fn parse_document(text: &str) -> Option<PolicyDocument> {
    serde_yaml::from_str(text).ok().or_else(|| serde_json::from_str(text).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_explicit_cs_tier_wins_over_any_document() {
        let resolved = resolve_tier_from_env(Some("pro"), None, None, b"");
        assert_eq!(resolved.tier, Tier::Pro);
    }

    #[test]
    fn no_configuration_at_all_fails_closed_to_community() {
        let resolved = resolve_tier_from_env(None, None, None, b"");
        assert_eq!(resolved.tier, Tier::Community);
    }
}

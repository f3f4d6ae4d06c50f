//! Tiers and their capability/limit table (spec.md §4.8).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Community,
    Pro,
    Enterprise,
}

impl Tier {
    pub fn parse(value: &str) -> Option<Tier> {
        match value.to_ascii_lowercase().as_str() {
            "community" => Some(Tier::Community),
            "pro" => Some(Tier::Pro),
            "enterprise" => Some(Tier::Enterprise),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Community => "community",
            Tier::Pro => "pro",
            Tier::Enterprise => "enterprise",
        }
    }
}

/// A numeric limit; `None` means unlimited (spec.md §4.8 table).
pub type Limit = Option<u64>;

#[derive(Debug, Clone, PartialEq)]
pub struct TierCaps {
    pub max_findings: Limit,
    pub max_taint_depth: Limit,
    pub max_modules: Limit,
    pub confidence_scoring: bool,
    pub sanitizer_recognition: bool,
    pub cross_file_scan: bool,
    pub audit_logging: bool,
    pub policy_signing_required: bool,
    pub unlimited_scale: bool,
}

impl Tier {
    /// The built-in capability table (spec.md §4.8). A loaded
    /// [`crate::features::policy::domain::PolicyDocument`] may override
    /// any of these per the active policy; this is the fail-closed
    /// default when no document overrides them.
    pub fn caps(&self) -> TierCaps {
        match self {
            Tier::Community => TierCaps {
                max_findings: Some(50),
                max_taint_depth: Some(3),
                max_modules: Some(10),
                confidence_scoring: false,
                sanitizer_recognition: false,
                cross_file_scan: false,
                audit_logging: false,
                policy_signing_required: false,
                unlimited_scale: false,
            },
            Tier::Pro => TierCaps {
                max_findings: None,
                max_taint_depth: Some(10),
                max_modules: Some(100),
                confidence_scoring: true,
                sanitizer_recognition: true,
                cross_file_scan: true,
                audit_logging: true,
                policy_signing_required: false,
                unlimited_scale: false,
            },
            Tier::Enterprise => TierCaps {
                max_findings: None,
                max_taint_depth: None,
                max_modules: None,
                confidence_scoring: true,
                sanitizer_recognition: true,
                cross_file_scan: true,
                audit_logging: true,
                policy_signing_required: true,
                unlimited_scale: true,
            },
        }
    }
}

impl Default for Tier {
    /// Fail-closed (spec.md §4.8): an undeterminable tier runs at Community.
    fn default() -> Self {
        Tier::Community
    }
}

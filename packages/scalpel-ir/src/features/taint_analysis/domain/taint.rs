//! Taint state and finding records (spec.md §3 "Taint State", §4.5: C5).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::shared::span::SourceSpan;

/// Ordered so `PartialOrd`/`Ord` give the "max level" comparison spec.md
/// §4.5 rule 2 needs directly (`Untainted < Low < ... < Critical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaintLevel {
    Untainted,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SinkCategory {
    Sql,
    Command,
    Xss,
    Path,
    Deserialize,
    Ssrf,
    Ldap,
    Nosql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FindingSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<TaintLevel> for FindingSeverity {
    fn from(level: TaintLevel) -> Self {
        match level {
            TaintLevel::Untainted | TaintLevel::Low => FindingSeverity::Low,
            TaintLevel::Medium => FindingSeverity::Medium,
            TaintLevel::High => FindingSeverity::High,
            TaintLevel::Critical => FindingSeverity::Critical,
        }
    }
}

/// `TaintMap: Var -> TaintInfo` (spec.md §3). Carried per-function during
/// the walk; never persisted past one analysis (spec.md §3 "Lifecycle").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaintInfo {
    pub level: TaintLevel,
    pub sources: Vec<SourceSpan>,
    pub cleared_for_sinks: HashSet<SinkCategory>,
}

impl Default for TaintLevel {
    fn default() -> Self {
        TaintLevel::Untainted
    }
}

impl TaintInfo {
    pub fn untainted() -> Self {
        Self::default()
    }

    pub fn is_tainted(&self) -> bool {
        self.level > TaintLevel::Untainted
    }

    /// Rule 2 (spec.md §4.5): binary operations take the max level of
    /// their operands and unify sources.
    pub fn merge_max(a: &TaintInfo, b: &TaintInfo) -> TaintInfo {
        let level = a.level.max(b.level);
        let mut sources = a.sources.clone();
        sources.extend(b.sources.iter().cloned());
        let mut cleared = a.cleared_for_sinks.clone();
        cleared.extend(b.cleared_for_sinks.iter().copied());
        TaintInfo { level, sources, cleared_for_sinks: cleared }
    }
}

pub type TaintMap = HashMap<String, TaintInfo>;

/// A taint reaching a sink it was not cleared for (spec.md §4.5 rule 5, §3
/// "Finding record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub source: SourceSpan,
    pub sink: SourceSpan,
    pub sink_category: SinkCategory,
    pub chain: Vec<SourceSpan>,
    pub confidence: f64,
    pub severity: FindingSeverity,
    pub taint_level: TaintLevel,
    pub cwe: Option<&'static str>,
}

/// Why an inter-procedural walk stopped early (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruncationReason {
    Depth,
    Modules,
    Timeout,
}

impl TruncationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncationReason::Depth => "depth",
            TruncationReason::Modules => "modules",
            TruncationReason::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub findings: Vec<Finding>,
    pub truncated: bool,
    pub truncation_reason: Option<TruncationReason>,
}

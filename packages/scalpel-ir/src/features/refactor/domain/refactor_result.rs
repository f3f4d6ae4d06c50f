//! The `simulate_refactor` output record (spec.md §4.10).

use serde::{Deserialize, Serialize};

use crate::features::taint_analysis::domain::taint::Finding;

use super::change_record::{ChangeRecord, ReferenceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Equivalence {
    Equivalent,
    NotEquivalent,
    /// Solver timeout or an incomparable pair of functions (spec.md §4.10:
    /// "solver timeout ⇒ `unknown`").
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorResult {
    pub is_safe: bool,
    pub changes: Vec<ChangeRecord>,
    pub behavioral_equivalent: Equivalence,
    pub new_findings: Vec<Finding>,
    pub references_affected: Vec<ReferenceLocation>,
}

impl RefactorResult {
    /// spec.md §4.10: "`is_safe` iff `new_findings` is empty AND
    /// `behavioral_equivalent ∈ {true, unknown}` AND no reference appears
    /// unresolved."
    pub fn compute_is_safe(
        new_findings: &[Finding],
        behavioral_equivalent: Equivalence,
        references_affected: &[ReferenceLocation],
    ) -> bool {
        new_findings.is_empty()
            && behavioral_equivalent != Equivalence::NotEquivalent
            && references_affected.iter().all(|r| r.resolved)
    }
}

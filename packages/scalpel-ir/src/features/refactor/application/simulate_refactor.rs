//! `simulate_refactor` use case (spec.md §4.10: C10) — combines structural
//! diff, reference enumeration, dual-run security scanning, and
//! behavioral-equivalence checking into one safety verdict.

use std::collections::HashSet;

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::{default_registry, parse_file};
use crate::features::refactor::domain::{Equivalence, RefactorResult};
use crate::features::refactor::infrastructure::{check_equivalence, diff_modules, find_references};
use crate::features::taint_analysis::application::scan_module::scan_module;
use crate::features::taint_analysis::infrastructure::registry::TaintConfig;
use crate::shared::ir::{Ir, IrKind};

#[derive(Debug, Clone, Default)]
pub struct RefactorInput {
    pub file_path: String,
    pub original_source: String,
    pub proposed_source: String,
    /// `(old_name, new_name)` when this simulation is checking a rename
    /// (spec.md §4.10 literal scenario 4); `None` for a general edit.
    pub rename: Option<(String, String)>,
    /// The rest of the project, for cross-file reference enumeration
    /// (string literals in sibling files may reference the renamed
    /// symbol even though they never appear in `file_path` itself).
    pub project_files: Vec<(String, String)>,
}

pub fn simulate_refactor(input: &RefactorInput) -> Result<RefactorResult> {
    let registry = default_registry();
    let original = parse_file(&registry, &input.file_path, &input.original_source)
        .map_err(|e| ScalpelError::analysis(format!("original version failed to parse: {e}")))?;
    let proposed = parse_file(&registry, &input.file_path, &input.proposed_source)
        .map_err(|e| ScalpelError::analysis(format!("proposed version failed to parse: {e}")))?;

    let changes = diff_modules(&original.root, &proposed.root);

    let references_affected = match &input.rename {
        Some((old_name, _)) => {
            let mut files = vec![(input.file_path.clone(), input.proposed_source.clone())];
            files.extend(input.project_files.clone());
            find_references(&files, old_name)
        }
        None => Vec::new(),
    };

    let registry_config = TaintConfig::default_config();
    let original_outcome = scan_module(&original, &registry_config);
    let proposed_outcome = scan_module(&proposed, &registry_config);
    let original_keys: HashSet<(String, String)> = original_outcome
        .findings
        .iter()
        .map(|f| (format!("{:?}", f.source.byte_span), format!("{:?}", f.sink.byte_span)))
        .collect();
    let new_findings: Vec<_> = proposed_outcome
        .findings
        .into_iter()
        .filter(|f| {
            !original_keys.contains(&(format!("{:?}", f.source.byte_span), format!("{:?}", f.sink.byte_span)))
        })
        .collect();

    let old_name = input.rename.as_ref().map(|(old, _)| old.as_str());
    let new_name = input.rename.as_ref().map(|(_, new)| new.as_str());
    let behavioral_equivalent = match (
        find_function(&original.root, old_name),
        find_function(&proposed.root, new_name.or(old_name)),
    ) {
        (Some(before), Some(after)) => check_equivalence(before, after),
        _ => Equivalence::Unknown,
    };

    let is_safe = RefactorResult::compute_is_safe(&new_findings, behavioral_equivalent, &references_affected);

    Ok(RefactorResult { is_safe, changes, behavioral_equivalent, new_findings, references_affected })
}

/// The function named `name`, or the first function in the module when
/// `name` is `None` (a plain original/proposed-code comparison with no
/// rename in play).
fn find_function<'a>(root: &'a Ir, name: Option<&str>) -> Option<&'a Ir> {
    root.walk_preorder().into_iter().find(|n| match (&n.kind, name) {
        (IrKind::FunctionDef { name: fn_name, .. }, Some(target)) => fn_name == target,
        (IrKind::FunctionDef { .. }, None) => true,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_safe_edit_with_no_new_findings_and_equivalent_behavior_is_safe() {
        let input = RefactorInput {
            file_path: "a.py".into(),
            original_source: "def f(x):\n    if x > 0:\n        return 1\n    return 0\n".into(),
            proposed_source: "def f(x):\n    if x > 0:\n        return 1\n    return 0\n".into(),
            rename: None,
            project_files: vec![],
        };
        let result = simulate_refactor(&input).unwrap();
        assert!(result.is_safe);
        assert_eq!(result.behavioral_equivalent, Equivalence::Equivalent);
    }

    #[test]
    fn renaming_into_a_sql_literal_is_unsafe_despite_no_new_findings() {
        let input = RefactorInput {
            file_path: "m.py".into(),
            original_source: "def handler(user_id):\n    return user_id\n".into(),
            proposed_source: "def handler(account_id):\n    return account_id\n".into(),
            rename: Some(("user_id".into(), "account_id".into())),
            project_files: vec![("report.sql".into(), "SELECT user_id FROM users\n".into())],
        };
        let result = simulate_refactor(&input).unwrap();
        assert!(result.new_findings.is_empty());
        assert!(!result.is_safe, "an unresolved string-literal reference must block safety");
        assert!(result.references_affected.iter().any(|r| r.file_path == "report.sql" && !r.resolved));
    }
}

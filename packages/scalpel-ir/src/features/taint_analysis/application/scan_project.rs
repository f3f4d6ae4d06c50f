//! Cross-file taint scan (spec.md §4.5): every function is analyzed as a
//! potential entry point, following resolved call-graph edges into other
//! modules up to the caller-supplied depth/module budget (spec.md §4.8
//! ties these to the active tier).

use std::collections::HashSet;

use crate::features::cross_file::domain::ProjectIndex;
use crate::features::parsing::domain::ParsedModule;
use crate::features::taint_analysis::domain::taint::{ScanOutcome, TaintMap, TruncationReason};
use crate::features::taint_analysis::infrastructure::function_index::index_functions;
use crate::features::taint_analysis::infrastructure::registry::TaintConfig;
use crate::features::taint_analysis::infrastructure::walker::{analyze_function, InterproceduralContext, Limits};
use crate::shared::span::SourceSpan;

pub fn scan_project(
    modules: &[ParsedModule],
    index: &ProjectIndex,
    registry: &TaintConfig,
    limits: Limits,
) -> ScanOutcome {
    let function_index = index_functions(&index.tables, modules);
    let ctx = InterproceduralContext { call_graph: &index.call_graph, function_index: &function_index, limits };

    let mut seen: HashSet<(SourceSpan, SourceSpan)> = HashSet::new();
    let mut outcome = ScanOutcome::default();

    for (node_id, function_ref) in &function_index {
        let result = analyze_function(
            function_ref.function,
            node_id,
            TaintMap::new(),
            registry,
            Some(&ctx),
            0,
            &HashSet::from([function_ref.file_path.clone()]),
            &[],
        );
        for finding in result.findings {
            let key = (finding.source.clone(), finding.sink.clone());
            if seen.insert(key) {
                outcome.findings.push(finding);
            }
        }
        if result.truncated {
            outcome.truncated = true;
            outcome.truncation_reason = merge_reason(outcome.truncation_reason, result.truncation_reason);
        }
    }

    outcome
}

fn merge_reason(a: Option<TruncationReason>, b: Option<TruncationReason>) -> Option<TruncationReason> {
    match (a, b) {
        (Some(TruncationReason::Modules), _) | (_, Some(TruncationReason::Modules)) => Some(TruncationReason::Modules),
        (Some(x), _) => Some(x),
        (None, y) => y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cross_file::application::build_project_index;
    use crate::features::parsing::{default_registry, parse_file};

    #[test]
    fn follows_a_call_into_another_module_to_find_the_sink() {
        let registry = default_registry();
        let handler = parse_file(
            &registry,
            "handler.py",
            "from storage import save\n\ndef handler(request):\n    q = request.args.get('id')\n    save(q)\n",
        )
        .unwrap();
        let storage = parse_file(&registry, "storage.py", "def save(cursor_value):\n    cursor.execute(cursor_value)\n").unwrap();
        let modules = vec![handler, storage];
        let index = build_project_index(&modules);
        let limits = Limits { max_depth: 10, max_modules: 100 };
        let outcome = scan_project(&modules, &index, &TaintConfig::default_config(), limits);
        assert!(!outcome.findings.is_empty());
    }

    #[test]
    fn zero_depth_budget_truncates_before_following_any_call() {
        let registry = default_registry();
        let handler = parse_file(
            &registry,
            "handler.py",
            "from storage import save\n\ndef handler(request):\n    q = request.args.get('id')\n    save(q)\n",
        )
        .unwrap();
        let storage = parse_file(&registry, "storage.py", "def save(cursor_value):\n    cursor.execute(cursor_value)\n").unwrap();
        let modules = vec![handler, storage];
        let index = build_project_index(&modules);
        let limits = Limits { max_depth: 0, max_modules: 100 };
        let outcome = scan_project(&modules, &index, &TaintConfig::default_config(), limits);
        assert!(outcome.findings.is_empty());
        assert!(outcome.truncated);
    }
}

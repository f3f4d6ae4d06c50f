//! Per-file taint scan (spec.md §4.5, the `security_scan` tool's
//! single-module mode): every function in one module is analyzed in
//! isolation, with no cross-module call following.

use crate::features::parsing::domain::ParsedModule;
use crate::features::taint_analysis::domain::taint::{ScanOutcome, TaintMap};
use crate::features::taint_analysis::infrastructure::registry::TaintConfig;
use crate::features::taint_analysis::infrastructure::walker::analyze_function;
use crate::shared::ir::IrKind;

pub fn scan_module(module: &ParsedModule, registry: &TaintConfig) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    for function in functions_in(&module.root) {
        let result = analyze_function(
            function,
            &function.node_id,
            TaintMap::new(),
            registry,
            None,
            0,
            &Default::default(),
            &[],
        );
        outcome.findings.extend(result.findings);
    }
    outcome
}

fn functions_in(node: &crate::shared::ir::Ir) -> Vec<&crate::shared::ir::Ir> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect<'a>(node: &'a crate::shared::ir::Ir, out: &mut Vec<&'a crate::shared::ir::Ir>) {
    if matches!(node.kind, IrKind::FunctionDef { .. }) {
        out.push(node);
    }
    for child in node.children() {
        collect(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};

    #[test]
    fn finds_tainted_sink_within_a_single_module() {
        let registry = default_registry();
        let module = parse_file(
            &registry,
            "a.py",
            "def handler(request, cursor):\n    q = request.args.get('id')\n    cursor.execute(q)\n",
        )
        .unwrap();
        let outcome = scan_module(&module, &TaintConfig::default_config());
        assert_eq!(outcome.findings.len(), 1);
    }
}

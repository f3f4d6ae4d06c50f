//! Per-function PDG construction (spec.md §4.4): control edges first, then
//! data edges, combined into one [`ProgramDependenceGraph`] keyed by a hash
//! of the function body so C7's analysis cache can key PDG lookups on it.

use crate::errors::{Result, ScalpelError};
use crate::features::pdg::domain::{DependenceEdge, ProgramDependenceGraph};
use crate::features::pdg::infrastructure::{cfg_builder, reaching_definitions};
use crate::shared::ir::{Ir, IrKind};

pub fn build_pdg(function: &Ir) -> Result<ProgramDependenceGraph> {
    let IrKind::FunctionDef { body, .. } = &function.kind else {
        return Err(ScalpelError::analysis(format!(
            "build_pdg expects a FunctionDef node, got {}",
            function.kind_name()
        )));
    };

    let mut nodes = Vec::new();
    let mut edges: Vec<DependenceEdge> = Vec::new();
    cfg_builder::walk_block(body, vec![function.node_id.clone()], &mut nodes, &mut edges);
    edges.extend(reaching_definitions::compute(body));

    let function_body_hash = body_hash(function);
    Ok(ProgramDependenceGraph { function_id: function.node_id.clone(), function_body_hash, nodes, edges })
}

fn body_hash(function: &Ir) -> String {
    let bytes = serde_json::to_vec(function).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};
    use crate::shared::ir::IrKind;

    fn first_function(module_source: &str) -> Ir {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", module_source).unwrap();
        let IrKind::Module { body } = module.root.kind else { panic!("expected module") };
        body.into_iter().find(|n| matches!(n.kind, IrKind::FunctionDef { .. })).unwrap()
    }

    #[test]
    fn builds_control_and_data_edges_for_a_simple_function() {
        let function = first_function("def f(x):\n    y = x + 1\n    return y\n");
        let pdg = build_pdg(&function).unwrap();
        assert!(!pdg.nodes.is_empty());
        assert!(pdg.control_edges().count() > 0);
        assert!(pdg.data_edges().count() > 0);
    }

    #[test]
    fn same_body_produces_the_same_hash() {
        let a = first_function("def f(x):\n    return x\n");
        let b = first_function("def f(x):\n    return x\n");
        assert_eq!(build_pdg(&a).unwrap().function_body_hash, build_pdg(&b).unwrap().function_body_hash);
    }
}

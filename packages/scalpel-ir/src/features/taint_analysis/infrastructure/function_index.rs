//! Maps call-graph node ids back to the `FunctionDef` they name, so the
//! inter-procedural walk can follow an edge from [`CallGraph::callees`]
//! straight to a body to analyze (spec.md §4.5).

use std::collections::HashMap;

use crate::features::parsing::domain::ParsedModule;
use crate::shared::ids::NodeId;
use crate::shared::ir::{Ir, IrKind};
use crate::shared::symbol::SymbolTable;

pub struct FunctionRef<'a> {
    pub file_path: String,
    pub function: &'a Ir,
}

pub fn index_functions<'a>(
    tables: &HashMap<String, SymbolTable>,
    modules: &'a [ParsedModule],
) -> HashMap<NodeId, FunctionRef<'a>> {
    let mut out = HashMap::new();
    for module in modules {
        let mut scope_chain = Vec::new();
        collect(module, &module.root, &mut scope_chain, tables, &mut out);
    }
    out
}

fn collect<'a>(
    module: &'a ParsedModule,
    node: &'a Ir,
    scope_chain: &mut Vec<String>,
    tables: &HashMap<String, SymbolTable>,
    out: &mut HashMap<NodeId, FunctionRef<'a>>,
) {
    match &node.kind {
        IrKind::FunctionDef { name, params, body, .. } => {
            scope_chain.push(name.clone());
            let fqn = scope_chain.join(".");
            let node_id = tables
                .get(&module.file_path)
                .and_then(|t| t.by_fqn(&fqn))
                .map(|s| s.node_id.clone())
                .unwrap_or_else(|| node.node_id.clone());
            out.insert(node_id, FunctionRef { file_path: module.file_path.clone(), function: node });
            for param in params {
                collect(module, param, scope_chain, tables, out);
            }
            for stmt in body {
                collect(module, stmt, scope_chain, tables, out);
            }
            scope_chain.pop();
        }
        IrKind::ClassDef { name, body, .. } => {
            scope_chain.push(name.clone());
            for stmt in body {
                collect(module, stmt, scope_chain, tables, out);
            }
            scope_chain.pop();
        }
        _ => {
            for child in node.children() {
                collect(module, child, scope_chain, tables, out);
            }
        }
    }
}

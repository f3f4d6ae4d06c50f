//! Data-dependence edges via a reaching-definitions analysis (spec.md
//! §4.4). Every `Name` read inside a contributing expression — a binary
//! operation, a format-string fragment, a collection literal, a call
//! argument — picks up an edge from whichever definitions reach that point,
//! since `Ir::children`/`walk_preorder` already expose those sub-expressions
//! uniformly regardless of which surface syntax produced them.
//!
//! Loop bodies are analyzed with a second, merged pass so a definition from
//! one iteration can reach a use earlier in the next iteration's body; this
//! is an approximation of a full fixed-point iteration, sufficient for the
//! bounded per-function graphs this component produces.

use std::collections::HashMap;

use crate::shared::ids::NodeId;
use crate::shared::ir::{Ir, IrKind};

use super::super::domain::DependenceEdge;

type DefMap = HashMap<String, Vec<NodeId>>;

fn merge(mut a: DefMap, b: DefMap) -> DefMap {
    for (var, defs) in b {
        let entry = a.entry(var).or_default();
        for d in defs {
            if !entry.contains(&d) {
                entry.push(d);
            }
        }
    }
    a
}

fn emit_uses(expr: &Ir, defs: &DefMap, use_node: &NodeId, edges: &mut Vec<DependenceEdge>) {
    for node in expr.walk_preorder() {
        if let IrKind::Name { id } = &node.kind {
            if let Some(sources) = defs.get(id) {
                for from in sources {
                    edges.push(DependenceEdge::Data { from: from.clone(), to: use_node.clone(), var: id.clone() });
                }
            }
        }
        if let IrKind::Call { args, .. } = &node.kind {
            for (i, arg) in args.iter().enumerate() {
                edges.push(DependenceEdge::Data {
                    from: arg.node_id.clone(),
                    to: format!("{}::arg{i}", node.node_id),
                    var: format!("arg{i}"),
                });
            }
            edges.push(DependenceEdge::Data {
                from: format!("{}::return", node.node_id),
                to: node.node_id.clone(),
                var: "return".to_string(),
            });
        }
    }
}

pub fn compute(body: &[Ir]) -> Vec<DependenceEdge> {
    let mut edges = Vec::new();
    walk_block(body, DefMap::new(), &mut edges);
    edges
}

fn walk_block(stmts: &[Ir], mut defs: DefMap, edges: &mut Vec<DependenceEdge>) -> DefMap {
    for stmt in stmts {
        defs = walk_stmt(stmt, defs, edges);
    }
    defs
}

fn walk_stmt(stmt: &Ir, defs: DefMap, edges: &mut Vec<DependenceEdge>) -> DefMap {
    match &stmt.kind {
        IrKind::Assign { target, value } => {
            emit_uses(value, &defs, &stmt.node_id, edges);
            let mut defs = defs;
            if let IrKind::Name { id } = &target.kind {
                defs.insert(id.clone(), vec![stmt.node_id.clone()]);
            } else {
                emit_uses(target, &defs, &stmt.node_id, edges);
            }
            defs
        }
        IrKind::VariableDecl { name, value } => {
            let mut defs = defs;
            if let Some(value) = value {
                emit_uses(value, &defs, &stmt.node_id, edges);
            }
            defs.insert(name.clone(), vec![stmt.node_id.clone()]);
            defs
        }
        IrKind::If { test, body, orelse } => {
            emit_uses(test, &defs, &stmt.node_id, edges);
            let body_exit = walk_block(body, defs.clone(), edges);
            let orelse_exit = if orelse.is_empty() { defs } else { walk_block(orelse, defs, edges) };
            merge(body_exit, orelse_exit)
        }
        IrKind::While { test, body } => {
            emit_uses(test, &defs, &stmt.node_id, edges);
            let once = walk_block(body, defs.clone(), edges);
            let merged = merge(defs, once);
            walk_block(body, merged.clone(), edges);
            merged
        }
        IrKind::For { item, iter, body } => {
            emit_uses(iter, &defs, &stmt.node_id, edges);
            let mut entry = defs.clone();
            if let IrKind::Name { id } = &item.kind {
                entry.insert(id.clone(), vec![stmt.node_id.clone()]);
            }
            let once = walk_block(body, entry, edges);
            let merged = merge(defs, once);
            walk_block(body, merged.clone(), edges);
            merged
        }
        IrKind::Try { body, handlers, finalizer } => {
            let mut exit = walk_block(body, defs.clone(), edges);
            for handler in handlers {
                let mut entry = defs.clone();
                if let Some(var) = &handler.var {
                    entry.insert(var.clone(), vec![stmt.node_id.clone()]);
                }
                exit = merge(exit, walk_block(&handler.body, entry, edges));
            }
            if finalizer.is_empty() { exit } else { walk_block(finalizer, exit, edges) }
        }
        IrKind::Return { value } | IrKind::Raise { value } => {
            if let Some(value) = value {
                emit_uses(value, &defs, &stmt.node_id, edges);
            }
            defs
        }
        IrKind::ExprStmt { expr } => {
            emit_uses(expr, &defs, &stmt.node_id, edges);
            defs
        }
        _ => defs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::span::SourceSpan;

    fn name(id: &str, node: &str) -> Ir {
        Ir::new(node.to_string(), SourceSpan::zero("a.py"), IrKind::Name { id: id.to_string() })
    }

    #[test]
    fn assignment_creates_a_definition_used_by_a_later_statement() {
        let def = Ir::new(
            "def".to_string(),
            SourceSpan::zero("a.py"),
            IrKind::Assign { target: Box::new(name("x", "target")), value: Box::new(name("y", "rhs")) },
        );
        let use_stmt = Ir::new(
            "use".to_string(),
            SourceSpan::zero("a.py"),
            IrKind::ExprStmt { expr: Box::new(name("x", "use_expr")) },
        );
        let edges = compute(&[def, use_stmt]);
        assert!(edges.contains(&DependenceEdge::Data {
            from: "def".to_string(),
            to: "use".to_string(),
            var: "x".to_string(),
        }));
    }

    #[test]
    fn call_arguments_bind_to_synthetic_parameter_nodes() {
        let call = Ir::new(
            "call".to_string(),
            SourceSpan::zero("a.py"),
            IrKind::Call {
                callee: Box::new(name("f", "callee")),
                args: vec![name("x", "arg0")],
                intrinsic: None,
                higher_order_kind: None,
                format_fragments: vec![],
                is_suspension_point: false,
            },
        );
        let stmt = Ir::new("stmt".to_string(), SourceSpan::zero("a.py"), IrKind::ExprStmt { expr: Box::new(call) });
        let edges = compute(&[stmt]);
        assert!(edges.contains(&DependenceEdge::Data {
            from: "arg0".to_string(),
            to: "call::arg0".to_string(),
            var: "arg0".to_string(),
        }));
    }
}

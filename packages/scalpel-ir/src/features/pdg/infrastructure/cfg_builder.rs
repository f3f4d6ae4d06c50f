//! Control-flow edges over a function body (spec.md §4.4: "compute
//! control-flow graph first ... `Control` edges including loop back-edges").
//!
//! This builds statement-level control edges directly from the IR's own
//! nesting rather than materializing separate basic-block objects — `If`,
//! `While`, `For`, and `Try` each know how to wire their own entry/exit
//! predecessor sets, which composes the same way a basic-block CFG would
//! without an intermediate representation of its own.

use crate::shared::ids::NodeId;
use crate::shared::ir::{Ir, IrKind};

use super::super::domain::DependenceEdge;

/// Walks `stmts` in order, threading `preds` (the predecessor set live at
/// block entry) through each statement and returning the predecessor set
/// live after the block — every node visited is appended to `nodes`.
pub fn walk_block(
    stmts: &[Ir],
    mut preds: Vec<NodeId>,
    nodes: &mut Vec<NodeId>,
    edges: &mut Vec<DependenceEdge>,
) -> Vec<NodeId> {
    for stmt in stmts {
        preds = walk_stmt(stmt, preds, nodes, edges);
    }
    preds
}

fn link(preds: &[NodeId], to: &NodeId, edges: &mut Vec<DependenceEdge>) {
    for from in preds {
        edges.push(DependenceEdge::Control { from: from.clone(), to: to.clone() });
    }
}

fn walk_stmt(
    stmt: &Ir,
    preds: Vec<NodeId>,
    nodes: &mut Vec<NodeId>,
    edges: &mut Vec<DependenceEdge>,
) -> Vec<NodeId> {
    nodes.push(stmt.node_id.clone());
    link(&preds, &stmt.node_id, edges);

    match &stmt.kind {
        IrKind::If { body, orelse, .. } => {
            let entry = vec![stmt.node_id.clone()];
            let body_exit = walk_block(body, entry.clone(), nodes, edges);
            if orelse.is_empty() {
                let mut exits = body_exit;
                exits.push(stmt.node_id.clone());
                exits
            } else {
                let orelse_exit = walk_block(orelse, entry, nodes, edges);
                [body_exit, orelse_exit].concat()
            }
        }
        IrKind::While { body, .. } => {
            let entry = vec![stmt.node_id.clone()];
            let body_exit = walk_block(body, entry, nodes, edges);
            // Loop back-edge: the last statement(s) of the body re-enter the test.
            link(&body_exit, &stmt.node_id, edges);
            vec![stmt.node_id.clone()]
        }
        IrKind::For { body, .. } => {
            let entry = vec![stmt.node_id.clone()];
            let body_exit = walk_block(body, entry, nodes, edges);
            link(&body_exit, &stmt.node_id, edges);
            vec![stmt.node_id.clone()]
        }
        IrKind::Try { body, handlers, finalizer } => {
            let entry = vec![stmt.node_id.clone()];
            let body_exit = walk_block(body, entry.clone(), nodes, edges);
            let mut exits = body_exit;
            for handler in handlers {
                // Any statement in the try body may raise into a handler.
                let handler_exit = walk_block(&handler.body, entry.clone(), nodes, edges);
                exits.extend(handler_exit);
            }
            if finalizer.is_empty() {
                exits
            } else {
                walk_block(finalizer, exits, nodes, edges)
            }
        }
        // Terminators: control never falls through to the next sibling.
        IrKind::Return { .. } | IrKind::Raise { .. } | IrKind::Break | IrKind::Continue => vec![],
        _ => vec![stmt.node_id.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ir::IrKind;
    use crate::shared::span::SourceSpan;

    fn pass(id: &str) -> Ir {
        Ir::new(id.to_string(), SourceSpan::zero("a.py"), IrKind::Pass)
    }

    #[test]
    fn sequential_statements_chain_control_edges() {
        let body = vec![pass("s1"), pass("s2")];
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        walk_block(&body, vec![], &mut nodes, &mut edges);
        assert_eq!(
            edges,
            vec![DependenceEdge::Control { from: "s1".into(), to: "s2".into() }]
        );
    }

    #[test]
    fn while_loop_produces_a_back_edge() {
        let while_stmt = Ir::new(
            "w".to_string(),
            SourceSpan::zero("a.py"),
            IrKind::While {
                test: Box::new(pass("t")),
                body: vec![pass("b1")],
            },
        );
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        walk_block(std::slice::from_ref(&while_stmt), vec![], &mut nodes, &mut edges);
        assert!(edges.contains(&DependenceEdge::Control { from: "b1".into(), to: "w".into() }));
    }
}

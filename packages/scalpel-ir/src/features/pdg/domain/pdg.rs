//! Program Dependence Graph domain model (spec.md §3 "PDG", §4.4: C4).

use crate::shared::ids::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependenceEdge {
    /// Basic control flow, including loop back-edges.
    Control { from: NodeId, to: NodeId },
    /// `var` is defined at `from` and referenced at `to` with no
    /// intervening redefinition (spec.md §3 PDG invariant).
    Data { from: NodeId, to: NodeId, var: String },
}

/// Per-function dependence graph. Nodes are the Universal Node IDs of the
/// IR statements/expressions of interest; `function_body_hash` is what the
/// analysis cache (C7) keys PDG entries on (spec.md §4.4: "PDG is cached
/// per function body hash").
#[derive(Debug, Clone)]
pub struct ProgramDependenceGraph {
    pub function_id: NodeId,
    pub function_body_hash: String,
    pub nodes: Vec<NodeId>,
    pub edges: Vec<DependenceEdge>,
}

impl ProgramDependenceGraph {
    pub fn control_edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.edges.iter().filter_map(|e| match e {
            DependenceEdge::Control { from, to } => Some((from, to)),
            DependenceEdge::Data { .. } => None,
        })
    }

    pub fn data_edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &str)> {
        self.edges.iter().filter_map(|e| match e {
            DependenceEdge::Data { from, to, var } => Some((from, to, var.as_str())),
            DependenceEdge::Control { .. } => None,
        })
    }

    pub fn predecessors(&self, node: &str) -> Vec<&NodeId> {
        self.edges
            .iter()
            .filter_map(|e| match e {
                DependenceEdge::Control { from, to } if to == node => Some(from),
                DependenceEdge::Data { from, to, .. } if to == node => Some(from),
                _ => None,
            })
            .collect()
    }
}

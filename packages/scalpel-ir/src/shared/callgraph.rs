//! Call graph: nodes are symbols, edges are call sites with a resolution
//! confidence (spec.md §4.3).

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::ids::NodeId;
use crate::shared::span::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionKind {
    /// Direct call to a statically known function/method.
    Direct,
    /// Virtual dispatch where the receiver's static type is known.
    VirtualTyped,
    /// Virtual dispatch where the receiver's type could not be narrowed.
    VirtualUntyped,
    /// Call through a value reached only dynamically (e.g. `getattr`,
    /// reflection, `eval`).
    Dynamic,
}

impl ResolutionKind {
    /// The confidence ceiling for this resolution kind (spec.md §4.3):
    /// direct = 1.0, virtual-typed = 0.9, virtual-untyped capped at 0.5,
    /// dynamic capped at 0.3.
    pub fn confidence_cap(&self) -> f64 {
        match self {
            ResolutionKind::Direct => 1.0,
            ResolutionKind::VirtualTyped => 0.9,
            ResolutionKind::VirtualUntyped => 0.5,
            ResolutionKind::Dynamic => 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEdgeData {
    pub call_site: SourceSpan,
    pub resolution_kind: ResolutionKind,
    pub confidence: f64,
    /// True if the callee was reached through an aliased import
    /// (`import foo as bar`, `from x import y as z`) rather than its
    /// original binding.
    pub via_aliased_import: bool,
}

impl CallEdgeData {
    pub fn new(call_site: SourceSpan, resolution_kind: ResolutionKind, via_aliased_import: bool) -> Self {
        let confidence = resolution_kind.confidence_cap();
        Self { call_site, resolution_kind, confidence, via_aliased_import }
    }
}

/// A directed graph of symbol-to-symbol calls. `NodeId` strings are the
/// Universal Node IDs of the caller/callee symbols.
#[derive(Debug, Default)]
pub struct CallGraph {
    graph: DiGraph<NodeId, CallEdgeData>,
    index_of: HashMap<NodeId, NodeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: &NodeId) -> NodeIndex {
        if let Some(&idx) = self.index_of.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index_of.insert(id.clone(), idx);
        idx
    }

    pub fn add_call(&mut self, caller: &NodeId, callee: &NodeId, data: CallEdgeData) {
        let from = self.ensure_node(caller);
        let to = self.ensure_node(callee);
        self.graph.add_edge(from, to, data);
    }

    pub fn callees(&self, caller: &NodeId) -> Vec<(&NodeId, &CallEdgeData)> {
        let Some(&idx) = self.index_of.get(caller) else {
            return vec![];
        };
        self.graph
            .edges(idx)
            .map(|e| (&self.graph[e.target()], e.weight()))
            .collect()
    }

    pub fn callers(&self, callee: &NodeId) -> Vec<(&NodeId, &CallEdgeData)> {
        let Some(&idx) = self.index_of.get(callee) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .map(|e| (&self.graph[e.source()], e.weight()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index_of.contains_key(id)
    }

    pub fn all_edges(&self) -> Vec<(&NodeId, &NodeId, &CallEdgeData)> {
        self.graph.edge_references().map(|e| (&self.graph[e.source()], &self.graph[e.target()], e.weight())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        s.to_string()
    }

    #[test]
    fn direct_calls_have_full_confidence() {
        let data = CallEdgeData::new(SourceSpan::zero("a.py"), ResolutionKind::Direct, false);
        assert_eq!(data.confidence, 1.0);
    }

    #[test]
    fn dynamic_calls_are_capped_low() {
        let data = CallEdgeData::new(SourceSpan::zero("a.py"), ResolutionKind::Dynamic, false);
        assert!(data.confidence <= 0.3);
    }

    #[test]
    fn callees_and_callers_are_symmetric() {
        let mut g = CallGraph::new();
        g.add_call(
            &id("a"),
            &id("b"),
            CallEdgeData::new(SourceSpan::zero("a.py"), ResolutionKind::Direct, false),
        );
        assert_eq!(g.callees(&id("a")).len(), 1);
        assert_eq!(g.callers(&id("b")).len(), 1);
        assert_eq!(g.callers(&id("a")).len(), 0);
    }
}

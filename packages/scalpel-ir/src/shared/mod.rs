//! Shared module — common types used across every feature.
//!
//! This module has no tree-sitter/solver/cache dependency of its own: it is
//! the vocabulary (IR, spans, ids, symbols, call graph, diagnostics) that the
//! frontends produce and every downstream analysis consumes.

pub mod callgraph;
pub mod clock;
pub mod constants;
pub mod ids;
pub mod ir;
pub mod ports;
pub mod span;
pub mod symbol;
pub mod utils;

pub use callgraph::{CallEdgeData, CallGraph, ResolutionKind};
pub use ids::{node_id, NodeId, SyntheticCounter};
pub use ir::{
    Diagnostic, ExceptHandler, FormatFragment, HigherOrderKind, Ir, IrKind, LiteralKind, Operator,
    Severity,
};
pub use ports::Language;
pub use span::{ByteSpan, SourceSpan};
pub use symbol::{SymbolKind, SymbolRecord, SymbolReference, SymbolTable};
pub use utils::ScopeStack;

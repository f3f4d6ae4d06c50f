//! The uniform Intermediate Representation (spec.md §3 "IR Node", §4.1).
//!
//! Every frontend lowers its concrete syntax tree into this fixed vocabulary.
//! Downstream analyses (symbol index, PDG, taint engine, symbolic executor)
//! only ever see `Ir` — they are language-agnostic because nothing past the
//! frontend boundary knows which grammar produced a given tree. Constructs a
//! frontend cannot or chooses not to normalize collapse into `Opaque`, which
//! preserves children (so totality — P2 — still holds) without claiming
//! further analyzability.

use serde::{Deserialize, Serialize};

use crate::shared::ids::NodeId;
use crate::shared::span::SourceSpan;

/// Fixed operator vocabulary (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    In,
    Is,
}

/// Marks a `Call` whose callee desugars a higher-order construct —
/// a Python comprehension, a JS `.map`/`.filter`/`.reduce`, a Java stream
/// pipeline stage (spec.md §4.2). The lambda/closure body is represented as
/// a nested `FunctionDef` passed as one of the call's arguments; this
/// annotation only records *why* the call looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HigherOrderKind {
    Comprehension,
    Map,
    Filter,
    Reduce,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    Int,
    Float,
    String,
    Bool,
    None,
}

/// One fragment of a string-interpolation call (spec.md §4.2: f-strings,
/// template literals, `String.format` all lower to
/// `Call(intrinsic="format", args=[…])`; fragments are kept separate from
/// their surrounding literal text so the taint engine can see exactly which
/// sub-expressions feed the sink).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FormatFragment {
    Literal(String),
    Expr(Box<Ir>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptHandler {
    pub exception_type: Option<String>,
    pub var: Option<String>,
    pub body: Vec<Ir>,
}

/// The tagged sum described in spec.md §3. `children()` below is the single
/// place that knows how to walk every variant, so visitors never need their
/// own match arm per node kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IrKind {
    // ---- Module root -----------------------------------------------------
    Module { body: Vec<Ir> },

    // ---- Declarations ------------------------------------------------
    FunctionDef {
        name: String,
        params: Vec<Ir>,
        body: Vec<Ir>,
        is_async: bool,
        higher_order_kind: Option<HigherOrderKind>,
    },
    ClassDef {
        name: String,
        bases: Vec<Ir>,
        body: Vec<Ir>,
    },
    VariableDecl {
        name: String,
        value: Option<Box<Ir>>,
    },
    Param {
        name: String,
        default: Option<Box<Ir>>,
    },

    // ---- Statements --------------------------------------------------
    Assign {
        target: Box<Ir>,
        value: Box<Ir>,
    },
    If {
        test: Box<Ir>,
        body: Vec<Ir>,
        orelse: Vec<Ir>,
    },
    While {
        test: Box<Ir>,
        body: Vec<Ir>,
    },
    For {
        item: Box<Ir>,
        iter: Box<Ir>,
        body: Vec<Ir>,
    },
    Try {
        body: Vec<Ir>,
        handlers: Vec<ExceptHandler>,
        finalizer: Vec<Ir>,
    },
    Return {
        value: Option<Box<Ir>>,
    },
    Raise {
        value: Option<Box<Ir>>,
    },
    Break,
    Continue,
    ExprStmt {
        expr: Box<Ir>,
    },

    // ---- Expressions ---------------------------------------------------
    BinaryOp {
        op: Operator,
        left: Box<Ir>,
        right: Box<Ir>,
    },
    UnaryOp {
        op: Operator,
        operand: Box<Ir>,
    },
    Call {
        callee: Box<Ir>,
        args: Vec<Ir>,
        /// Set for intrinsic desugarings, e.g. `"format"` for string
        /// interpolation (spec.md §4.2).
        intrinsic: Option<String>,
        higher_order_kind: Option<HigherOrderKind>,
        /// Fragments backing a `format` intrinsic call; empty otherwise.
        format_fragments: Vec<FormatFragment>,
        /// True if this call is an `await`/suspension point inside an
        /// `is_async` function (spec.md §4.2: async collapses to sync IR
        /// with this flag; the core ignores it outside documentation).
        is_suspension_point: bool,
    },
    Attribute {
        value: Box<Ir>,
        attr: String,
    },
    Subscript {
        value: Box<Ir>,
        index: Box<Ir>,
    },
    Name {
        id: String,
    },
    Literal {
        kind: LiteralKind,
        text: String,
    },

    // ---- Control ---------------------------------------------------------
    Pass,

    /// Escape hatch for constructs a frontend does not normalize further.
    /// Children are preserved so every byte of source still lies within
    /// some node's span (P2), but nothing past this point is analyzed.
    Opaque {
        original_kind: String,
        children: Vec<Ir>,
    },
}

/// One node of the IR: a `kind`, the span it came from, and a stable
/// Universal Node ID (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ir {
    pub node_id: NodeId,
    pub span: SourceSpan,
    pub kind: IrKind,
}

impl Ir {
    pub fn new(node_id: NodeId, span: SourceSpan, kind: IrKind) -> Self {
        Self { node_id, span, kind }
    }

    /// Short discriminant name, used for diagnostics and dispatch logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            IrKind::Module { .. } => "Module",
            IrKind::FunctionDef { .. } => "FunctionDef",
            IrKind::ClassDef { .. } => "ClassDef",
            IrKind::VariableDecl { .. } => "VariableDecl",
            IrKind::Param { .. } => "Param",
            IrKind::Assign { .. } => "Assign",
            IrKind::If { .. } => "If",
            IrKind::While { .. } => "While",
            IrKind::For { .. } => "For",
            IrKind::Try { .. } => "Try",
            IrKind::Return { .. } => "Return",
            IrKind::Raise { .. } => "Raise",
            IrKind::Break => "Break",
            IrKind::Continue => "Continue",
            IrKind::ExprStmt { .. } => "ExprStmt",
            IrKind::BinaryOp { .. } => "BinaryOp",
            IrKind::UnaryOp { .. } => "UnaryOp",
            IrKind::Call { .. } => "Call",
            IrKind::Attribute { .. } => "Attribute",
            IrKind::Subscript { .. } => "Subscript",
            IrKind::Name { .. } => "Name",
            IrKind::Literal { .. } => "Literal",
            IrKind::Pass => "Pass",
            IrKind::Opaque { .. } => "Opaque",
        }
    }

    /// Children in document order — the single traversal rule every visitor
    /// shares (spec.md §4.1: "the observable traversal order is fixed to
    /// document order for reproducibility").
    pub fn children(&self) -> Vec<&Ir> {
        match &self.kind {
            IrKind::Module { body } => body.iter().collect(),
            IrKind::FunctionDef { params, body, .. } => {
                params.iter().chain(body.iter()).collect()
            }
            IrKind::ClassDef { bases, body, .. } => bases.iter().chain(body.iter()).collect(),
            IrKind::VariableDecl { value, .. } => value.iter().map(|b| b.as_ref()).collect(),
            IrKind::Param { default, .. } => default.iter().map(|b| b.as_ref()).collect(),
            IrKind::Assign { target, value } => vec![target.as_ref(), value.as_ref()],
            IrKind::If { test, body, orelse } => {
                std::iter::once(test.as_ref()).chain(body.iter()).chain(orelse.iter()).collect()
            }
            IrKind::While { test, body } => std::iter::once(test.as_ref()).chain(body.iter()).collect(),
            IrKind::For { item, iter, body } => {
                vec![item.as_ref(), iter.as_ref()].into_iter().chain(body.iter()).collect()
            }
            IrKind::Try { body, handlers, finalizer } => body
                .iter()
                .chain(handlers.iter().flat_map(|h| h.body.iter()))
                .chain(finalizer.iter())
                .collect(),
            IrKind::Return { value } | IrKind::Raise { value } => {
                value.iter().map(|b| b.as_ref()).collect()
            }
            IrKind::Break | IrKind::Continue | IrKind::Pass => vec![],
            IrKind::ExprStmt { expr } => vec![expr.as_ref()],
            IrKind::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            IrKind::UnaryOp { operand, .. } => vec![operand.as_ref()],
            IrKind::Call { callee, args, format_fragments, .. } => {
                std::iter::once(callee.as_ref())
                    .chain(args.iter())
                    .chain(format_fragments.iter().filter_map(|f| match f {
                        FormatFragment::Expr(e) => Some(e.as_ref()),
                        FormatFragment::Literal(_) => None,
                    }))
                    .collect()
            }
            IrKind::Attribute { value, .. } => vec![value.as_ref()],
            IrKind::Subscript { value, index } => vec![value.as_ref(), index.as_ref()],
            IrKind::Name { .. } | IrKind::Literal { .. } => vec![],
            IrKind::Opaque { children, .. } => children.iter().collect(),
        }
    }

    /// Pre-order document-order walk (depth-first, explicit stack — spec.md
    /// §4.1 permits either recursive or explicit-stack traversal as long as
    /// the observed order matches document order).
    pub fn walk_preorder(&self) -> Vec<&Ir> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut kids = node.children();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Frontend/dispatcher diagnostics (SPEC_FULL.md supplement: spec.md implies
/// diagnostics throughout but never types them explicitly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub code: &'static str,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Self { severity: Severity::Error, message: message.into(), span, code }
    }
    pub fn warning(code: &'static str, message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Self { severity: Severity::Warning, message: message.into(), span, code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str, file: &str) -> Ir {
        Ir::new(
            format!("python:{file}:1:0:{s}"),
            SourceSpan::new(file, 1, 0, 1, s.len() as u32, 0, s.len()),
            IrKind::Name { id: s.to_string() },
        )
    }

    #[test]
    fn walk_preorder_visits_in_document_order() {
        let assign = Ir::new(
            "python:a.py:1:0:assign".into(),
            SourceSpan::new("a.py", 1, 0, 1, 5, 0, 5),
            IrKind::Assign {
                target: Box::new(name("x", "a.py")),
                value: Box::new(name("y", "a.py")),
            },
        );
        let order: Vec<&str> = assign.walk_preorder().iter().map(|n| n.kind_name()).collect();
        assert_eq!(order, vec!["Assign", "Name", "Name"]);
    }

    #[test]
    fn opaque_preserves_children_for_totality() {
        let opaque = Ir::new(
            "python:a.py:1:0:<opaque>".into(),
            SourceSpan::new("a.py", 1, 0, 1, 1, 0, 1),
            IrKind::Opaque {
                original_kind: "match_statement".into(),
                children: vec![name("x", "a.py")],
            },
        );
        assert_eq!(opaque.children().len(), 1);
    }
}

//! Shared tree-sitter lowering helpers used by every frontend.
//!
//! Keeps span conversion and Universal Node ID assignment in one place so
//! each language module only has to describe *which* tree-sitter node kinds
//! map to which [`IrKind`](crate::shared::ir::IrKind) variant.

use tree_sitter::Node as TsNode;

use crate::features::parsing::domain::ImportStatement;
use crate::shared::ids::{node_id, SyntheticCounter};
use crate::shared::ir::{Ir, IrKind, LiteralKind};
use crate::shared::ports::Language;
use crate::shared::span::SourceSpan;

pub struct LoweringCtx<'a> {
    pub language: Language,
    pub relative_path: &'a str,
    pub source: &'a str,
    synth: SyntheticCounter,
    pub imports: Vec<ImportStatement>,
}

impl<'a> LoweringCtx<'a> {
    pub fn new(language: Language, relative_path: &'a str, source: &'a str) -> Self {
        Self { language, relative_path, source, synth: SyntheticCounter::new(), imports: Vec::new() }
    }

    /// Records an import statement a frontend recognized during lowering
    /// (feeds C3 cross-module resolution; spec.md §4.3).
    pub fn record_import(&mut self, import: ImportStatement) {
        self.imports.push(import);
    }

    pub fn text(&self, node: &TsNode) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    pub fn span(&self, node: &TsNode) -> SourceSpan {
        SourceSpan::new(
            self.relative_path,
            node.start_position().row as u32 + 1,
            node.start_position().column as u32,
            node.end_position().row as u32 + 1,
            node.end_position().column as u32,
            node.start_byte(),
            node.end_byte(),
        )
    }

    /// Universal Node ID for a node with a known symbol name.
    pub fn id(&self, node: &TsNode, name: &str) -> String {
        node_id(
            self.language,
            self.relative_path,
            node.start_position().row as u32 + 1,
            node.start_position().column as u32,
            name,
        )
    }

    /// Universal Node ID for a node with no natural name (expressions,
    /// statements without a binder).
    pub fn synthetic_id(&mut self, node: &TsNode, kind: &str) -> String {
        let synthetic = self.synth.next(kind);
        self.id(node, &synthetic)
    }

    pub fn name_node(&mut self, node: &TsNode, id: &str) -> Ir {
        Ir::new(self.synthetic_id(node, "name"), self.span(node), IrKind::Name { id: id.to_string() })
    }

    pub fn literal_node(&mut self, node: &TsNode, kind: LiteralKind) -> Ir {
        Ir::new(
            self.synthetic_id(node, "literal"),
            self.span(node),
            IrKind::Literal { kind, text: self.text(node).to_string() },
        )
    }

    pub fn opaque_node(&mut self, node: &TsNode, children: Vec<Ir>) -> Ir {
        Ir::new(
            self.synthetic_id(node, "opaque"),
            self.span(node),
            IrKind::Opaque { original_kind: node.kind().to_string(), children },
        )
    }

    pub fn pass_node(&mut self, node: &TsNode) -> Ir {
        Ir::new(self.synthetic_id(node, "pass"), self.span(node), IrKind::Pass)
    }
}

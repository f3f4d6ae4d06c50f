//! TypeScript frontend (spec.md §4.2). Shares its lowering with the
//! JavaScript frontend (see [`super::ecma`]) — type annotations, interfaces,
//! and `as` casts have no IR counterpart and collapse to `Opaque`, but every
//! ordinary statement and expression lowers the same way in both languages.

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::infrastructure::frontends::ecma;
use crate::features::parsing::infrastructure::lowering::LoweringCtx;
use crate::features::parsing::ports::{FrontendOutput, LanguageFrontend};
use crate::shared::ir::{Ir, IrKind};
use crate::shared::ports::Language;

pub struct TypeScriptFrontend;

impl LanguageFrontend for TypeScriptFrontend {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn lower(&self, source: &str, relative_path: &str) -> Result<FrontendOutput> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_typescript::language_typescript())
            .map_err(|e| ScalpelError::parse(format!("typescript grammar init failed: {e}")))?;
        let tree = parser.parse(source, None).ok_or_else(|| ScalpelError::parse("typescript parser produced no tree"))?;

        let mut ctx = LoweringCtx::new(Language::TypeScript, relative_path, source);
        let mut diagnostics = Vec::new();
        let root_node = tree.root_node();
        ecma::collect_parse_errors(&root_node, &ctx, &mut diagnostics, "TS001");

        let body = ecma::lower_block(&mut ctx, &root_node);
        let root = Ir::new(ctx.id(&root_node, "<module>"), ctx.span(&root_node), IrKind::Module { body });
        let imports = std::mem::take(&mut ctx.imports);
        Ok(FrontendOutput { root, diagnostics, imports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Ir {
        TypeScriptFrontend.lower(source, "t.ts").unwrap().root
    }

    #[test]
    fn lowers_typed_function_ignoring_annotations() {
        let root = lower("function add(a: number, b: number): number {\n  return a + b;\n}\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                match &body[0].kind {
                    IrKind::FunctionDef { name, params, .. } => {
                        assert_eq!(name, "add");
                        assert_eq!(params.len(), 2);
                    }
                    other => panic!("expected FunctionDef, got {other:?}"),
                }
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn interface_declaration_collapses_to_opaque() {
        let root = lower("interface Point {\n  x: number;\n  y: number;\n}\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0].kind, IrKind::Opaque { .. }));
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }
}

//! JavaScript frontend (spec.md §4.2). Delegates to the shared ECMAScript
//! lowering in [`super::ecma`]; this module only wires up the
//! `tree-sitter-javascript` grammar.

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::infrastructure::frontends::ecma;
use crate::features::parsing::infrastructure::lowering::LoweringCtx;
use crate::features::parsing::ports::{FrontendOutput, LanguageFrontend};
use crate::shared::ir::{Ir, IrKind};
use crate::shared::ports::Language;

pub struct JavaScriptFrontend;

impl LanguageFrontend for JavaScriptFrontend {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn lower(&self, source: &str, relative_path: &str) -> Result<FrontendOutput> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_javascript::language())
            .map_err(|e| ScalpelError::parse(format!("javascript grammar init failed: {e}")))?;
        let tree = parser.parse(source, None).ok_or_else(|| ScalpelError::parse("javascript parser produced no tree"))?;

        let mut ctx = LoweringCtx::new(Language::JavaScript, relative_path, source);
        let mut diagnostics = Vec::new();
        let root_node = tree.root_node();
        ecma::collect_parse_errors(&root_node, &ctx, &mut diagnostics, "JS001");

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
        JavaScriptFrontend.lower(source, "t.js").unwrap().root
    }

    #[test]
    fn lowers_function_declaration() {
        let root = lower("function add(a, b) {\n  return a + b;\n}\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0].kind, IrKind::FunctionDef { .. }));
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn template_literal_desugars_to_format_call() {
        let root = lower("const msg = `hello ${name}`;\n");
        match &root.kind {
            IrKind::Module { body } => match &body[0].kind {
                IrKind::VariableDecl { value: Some(value), .. } => {
                    assert!(matches!(value.kind, IrKind::Call { intrinsic: Some(_), .. }));
                }
                other => panic!("expected VariableDecl, got {other:?}"),
            },
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn records_named_imports_for_cross_module_resolution() {
        let output = JavaScriptFrontend.lower("import {request} from \"express\";\n", "t.js").unwrap();
        assert_eq!(output.imports.len(), 1);
        assert_eq!(output.imports[0].module, "express");
        assert_eq!(output.imports[0].imported_name.as_deref(), Some("request"));
    }

    #[test]
    fn map_call_is_tagged_higher_order() {
        let root = lower("const y = items.map(x => x + 1);\n");
        match &root.kind {
            IrKind::Module { body } => match &body[0].kind {
                IrKind::VariableDecl { value: Some(value), .. } => {
                    assert!(matches!(
                        value.kind,
                        IrKind::Call { higher_order_kind: Some(crate::shared::ir::HigherOrderKind::Map), .. }
                    ));
                }
                other => panic!("expected VariableDecl, got {other:?}"),
            },
            other => panic!("expected Module, got {other:?}"),
        }
    }
}

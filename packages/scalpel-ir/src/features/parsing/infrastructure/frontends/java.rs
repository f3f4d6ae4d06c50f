//! Java frontend (spec.md §4.2). `String.format(...)` and stream pipeline
//! stages (`.stream().map(...).filter(...)`) lower to the same intrinsic and
//! `HigherOrderKind` annotations the other frontends use, so the taint
//! engine and PDG never special-case Java call sites.

use tree_sitter::Node as TsNode;

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::domain::ImportStatement;
use crate::features::parsing::infrastructure::lowering::LoweringCtx;
use crate::features::parsing::ports::{FrontendOutput, LanguageFrontend};
use crate::shared::ir::{Diagnostic, ExceptHandler, HigherOrderKind, Ir, IrKind, LiteralKind, Operator};
use crate::shared::ports::Language;

pub struct JavaFrontend;

impl LanguageFrontend for JavaFrontend {
    fn language(&self) -> Language {
        Language::Java
    }

    fn lower(&self, source: &str, relative_path: &str) -> Result<FrontendOutput> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|e| ScalpelError::parse(format!("java grammar init failed: {e}")))?;
        let tree = parser.parse(source, None).ok_or_else(|| ScalpelError::parse("java parser produced no tree"))?;

        let mut ctx = LoweringCtx::new(Language::Java, relative_path, source);
        let mut diagnostics = Vec::new();
        let root_node = tree.root_node();
        collect_parse_errors(&root_node, &ctx, &mut diagnostics);

        let body = lower_block(&mut ctx, &root_node);
        let root = Ir::new(ctx.id(&root_node, "<module>"), ctx.span(&root_node), IrKind::Module { body });
        let imports = std::mem::take(&mut ctx.imports);
        Ok(FrontendOutput { root, diagnostics, imports })
    }
}

fn collect_parse_errors(node: &TsNode, ctx: &LoweringCtx, out: &mut Vec<Diagnostic>) {
    if node.is_error() || node.is_missing() {
        out.push(Diagnostic::error("JV001", format!("parse error near '{}'", node.kind()), Some(ctx.span(node))));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_parse_errors(&child, ctx, out);
    }
}

fn lower_block(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).flat_map(|child| lower_statement(ctx, &child)).collect()
}

fn lower_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    match node.kind() {
        "class_declaration" | "interface_declaration" | "enum_declaration" => vec![lower_class(ctx, node)],
        "method_declaration" | "constructor_declaration" => vec![lower_method(ctx, node)],
        "field_declaration" | "local_variable_declaration" => lower_variable_declaration(ctx, node),
        "expression_statement" => node.named_child(0).map(|e| lower_expr_statement(ctx, node, &e)).into_iter().collect(),
        "if_statement" => vec![lower_if(ctx, node)],
        "while_statement" => vec![lower_while(ctx, node)],
        "enhanced_for_statement" => vec![lower_enhanced_for(ctx, node)],
        "for_statement" => vec![lower_c_style_for(ctx, node)],
        "try_statement" => vec![lower_try(ctx, node)],
        "return_statement" => vec![lower_return(ctx, node)],
        "throw_statement" => vec![lower_throw(ctx, node)],
        "break_statement" => vec![Ir::new(ctx.synthetic_id(node, "break"), ctx.span(node), IrKind::Break)],
        "continue_statement" => vec![Ir::new(ctx.synthetic_id(node, "continue"), ctx.span(node), IrKind::Continue)],
        "import_declaration" => {
            lower_import(ctx, node);
            vec![]
        }
        "package_declaration" | "line_comment" | "block_comment" => vec![],
        _ => vec![lower_opaque_statement(ctx, node)],
    }
}

/// `import java.util.List;` / `import static java.lang.Math.*;` (spec.md
/// §4.3 cross-module resolution). Java has no `as`, so `alias` is always
/// `None`; the bound local name is the path's last segment.
fn lower_import(ctx: &mut LoweringCtx, node: &TsNode) {
    let is_wildcard = {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "asterisk")
    };
    let mut cursor = node.walk();
    let path = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
        .map(|n| ctx.text(&n).to_string())
        .unwrap_or_default();
    if path.is_empty() {
        return;
    }
    if is_wildcard {
        ctx.record_import(ImportStatement {
            span: ctx.span(node),
            module: path,
            imported_name: None,
            alias: None,
            is_wildcard: true,
        });
        return;
    }
    let (module, imported_name) = match path.rsplit_once('.') {
        Some((module, name)) => (module.to_string(), Some(name.to_string())),
        None => (path, None),
    };
    ctx.record_import(ImportStatement {
        span: ctx.span(node),
        module,
        imported_name,
        alias: None,
        is_wildcard: false,
    });
}

fn lower_opaque_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut cursor = node.walk();
    let children: Vec<Ir> = node.named_children(&mut cursor).flat_map(|c| lower_statement(ctx, &c)).collect();
    ctx.opaque_node(node, children)
}

fn lower_class(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let bases = node
        .child_by_field_name("superclass")
        .into_iter()
        .chain(node.child_by_field_name("interfaces"))
        .map(|b| lower_expr(ctx, &b))
        .collect();
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.id(node, &name), ctx.span(node), IrKind::ClassDef { name, bases, body })
}

fn lower_method(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_else(|| "<init>".to_string());
    let params = node.child_by_field_name("parameters").map(|p| lower_params(ctx, &p)).unwrap_or_default();
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.id(node, &name), ctx.span(node), IrKind::FunctionDef { name, params, body, is_async: false, higher_order_kind: None })
}

fn lower_params(ctx: &mut LoweringCtx, params_node: &TsNode) -> Vec<Ir> {
    let mut cursor = params_node.walk();
    params_node
        .named_children(&mut cursor)
        .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
        .map(|p| {
            let name = p.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_else(|| ctx.text(&p).to_string());
            Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None })
        })
        .collect()
}

fn lower_variable_declaration(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "variable_declarator")
        .map(|decl| {
            let name = decl.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
            let value = decl.child_by_field_name("value").map(|v| Box::new(lower_expr(ctx, &v)));
            Ir::new(ctx.id(&decl, &name), ctx.span(&decl), IrKind::VariableDecl { name, value })
        })
        .collect()
}

fn lower_expr_statement(ctx: &mut LoweringCtx, stmt: &TsNode, inner: &TsNode) -> Ir {
    if inner.kind() == "assignment_expression" {
        let target = inner.child_by_field_name("left").map(|t| lower_expr(ctx, &t)).unwrap_or_else(|| ctx.name_node(inner, "<target>"));
        let op_text = inner.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
        let rhs = inner.child_by_field_name("right").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(inner, "<missing>"));
        let value = if op_text == "=" {
            rhs
        } else {
            let op = java_augmented_operator(&op_text);
            Ir::new(
                ctx.synthetic_id(inner, "augop"),
                ctx.span(inner),
                IrKind::BinaryOp { op, left: Box::new(target.clone()), right: Box::new(rhs) },
            )
        };
        return Ir::new(ctx.synthetic_id(stmt, "assign"), ctx.span(stmt), IrKind::Assign { target: Box::new(target), value: Box::new(value) });
    }
    let expr = lower_expr(ctx, inner);
    Ir::new(ctx.synthetic_id(stmt, "exprstmt"), ctx.span(stmt), IrKind::ExprStmt { expr: Box::new(expr) })
}

fn java_augmented_operator(text: &str) -> Operator {
    match text {
        "+=" => Operator::Add,
        "-=" => Operator::Sub,
        "*=" => Operator::Mul,
        "/=" => Operator::Div,
        "%=" => Operator::Mod,
        "&=" => Operator::BitAnd,
        "|=" => Operator::BitOr,
        "^=" => Operator::BitXor,
        "<<=" => Operator::Shl,
        ">>=" => Operator::Shr,
        _ => Operator::Add,
    }
}

fn lower_if(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let test = node.child_by_field_name("condition").map(|c| lower_expr(ctx, &c)).unwrap_or_else(|| ctx.name_node(node, "<cond>"));
    let body = node
        .child_by_field_name("consequence")
        .map(|b| if b.kind() == "block" { lower_block(ctx, &b) } else { lower_statement(ctx, &b) })
        .unwrap_or_default();
    let orelse = node
        .child_by_field_name("alternative")
        .map(|alt| match alt.kind() {
            "block" => lower_block(ctx, &alt),
            "if_statement" => vec![lower_if(ctx, &alt)],
            _ => lower_statement(ctx, &alt),
        })
        .unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "if"), ctx.span(node), IrKind::If { test: Box::new(test), body, orelse })
}

fn lower_while(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let test = node.child_by_field_name("condition").map(|c| lower_expr(ctx, &c)).unwrap_or_else(|| ctx.name_node(node, "<cond>"));
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "while"), ctx.span(node), IrKind::While { test: Box::new(test), body })
}

fn lower_enhanced_for(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let item_name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let item = Ir::new(ctx.id(node, &item_name), ctx.span(node), IrKind::Name { id: item_name });
    let iter = node.child_by_field_name("value").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<iter>"));
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "for"), ctx.span(node), IrKind::For { item: Box::new(item), iter: Box::new(iter), body })
}

/// C-style `for (init; test; update)` — see the ECMAScript frontend's
/// identical rationale for collapsing this shape to `Opaque`.
fn lower_c_style_for(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "local_variable_declaration" => children.extend(lower_variable_declaration(ctx, &child)),
            "block" => children.extend(lower_block(ctx, &child)),
            _ => children.push(lower_expr(ctx, &child)),
        }
    }
    ctx.opaque_node(node, children)
}

fn lower_try(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    let mut handlers = Vec::new();
    let mut finalizer = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "catch_clause" => handlers.push(lower_catch(ctx, &child)),
            "finally_clause" => {
                if let Some(b) = child.named_child(0) {
                    finalizer.extend(lower_block(ctx, &b));
                }
            }
            _ => {}
        }
    }
    Ir::new(ctx.synthetic_id(node, "try"), ctx.span(node), IrKind::Try { body, handlers, finalizer })
}

fn lower_catch(ctx: &mut LoweringCtx, node: &TsNode) -> ExceptHandler {
    let param = node.child_by_field_name("parameter");
    let exception_type = param
        .as_ref()
        .and_then(|p| p.child_by_field_name("type"))
        .map(|t| ctx.text(&t).to_string());
    let var = param.as_ref().and_then(|p| p.child_by_field_name("name")).map(|n| ctx.text(&n).to_string());
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    ExceptHandler { exception_type, var, body }
}

fn lower_return(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "return"), ctx.span(node), IrKind::Return { value })
}

fn lower_throw(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "raise"), ctx.span(node), IrKind::Raise { value })
}

const STREAM_METHODS: &[(&str, HigherOrderKind)] =
    &[("map", HigherOrderKind::Map), ("filter", HigherOrderKind::Filter), ("reduce", HigherOrderKind::Reduce), ("stream", HigherOrderKind::Stream)];

fn lower_expr(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    match node.kind() {
        "identifier" | "this" => {
            let id = ctx.text(node).to_string();
            Ir::new(ctx.id(node, &id), ctx.span(node), IrKind::Name { id })
        }
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal" => ctx.literal_node(node, LiteralKind::Int),
        "decimal_floating_point_literal" => ctx.literal_node(node, LiteralKind::Float),
        "true" | "false" => ctx.literal_node(node, LiteralKind::Bool),
        "null_literal" => ctx.literal_node(node, LiteralKind::None),
        "string_literal" | "character_literal" => ctx.literal_node(node, LiteralKind::String),
        "method_invocation" => lower_method_invocation(ctx, node),
        "object_creation_expression" => lower_object_creation(ctx, node),
        "field_access" => lower_field_access(ctx, node),
        "array_access" => lower_array_access(ctx, node),
        "binary_expression" => lower_binary(ctx, node),
        "unary_expression" => lower_unary(ctx, node),
        "parenthesized_expression" => node.named_child(0).map(|inner| lower_expr(ctx, &inner)).unwrap_or_else(|| ctx.name_node(node, "<empty>")),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<Ir> = node.named_children(&mut cursor).map(|c| lower_expr(ctx, &c)).collect();
            ctx.opaque_node(node, children)
        }
    }
}

/// `String.format(...)` gets the same `intrinsic = "format"` tag the other
/// frontends give their interpolation syntax; `.stream()/.map()/.filter()`
/// chains get `HigherOrderKind` the same way JS `.map`/`.filter` calls do.
fn lower_method_invocation(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name_node = node.child_by_field_name("name");
    let method_name = name_node.as_ref().map(|n| ctx.text(n).to_string()).unwrap_or_default();
    let object = node.child_by_field_name("object");
    let callee = match &object {
        Some(obj) => {
            let base = lower_expr(ctx, obj);
            Ir::new(ctx.synthetic_id(node, "attr"), ctx.span(node), IrKind::Attribute { value: Box::new(base), attr: method_name.clone() })
        }
        None => Ir::new(ctx.id(node, &method_name), ctx.span(node), IrKind::Name { id: method_name.clone() }),
    };
    let args = node
        .child_by_field_name("arguments")
        .map(|arglist| {
            let mut cursor = arglist.walk();
            arglist.named_children(&mut cursor).map(|a| lower_expr(ctx, &a)).collect()
        })
        .unwrap_or_default();

    let is_string_format = object
        .as_ref()
        .map(|o| o.kind() == "identifier" && ctx.text(o) == "String")
        .unwrap_or(false)
        && method_name == "format";
    let intrinsic = if is_string_format { Some("format".to_string()) } else { None };
    let higher_order_kind = STREAM_METHODS.iter().find(|(m, _)| *m == method_name).map(|(_, k)| *k);

    Ir::new(
        ctx.synthetic_id(node, "call"),
        ctx.span(node),
        IrKind::Call { callee: Box::new(callee), args, intrinsic, higher_order_kind, format_fragments: Vec::new(), is_suspension_point: false },
    )
}

fn lower_object_creation(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let type_name = node.child_by_field_name("type").map(|t| ctx.text(&t).to_string()).unwrap_or_default();
    let callee = Ir::new(ctx.id(node, &type_name), ctx.span(node), IrKind::Name { id: type_name });
    let args = node
        .child_by_field_name("arguments")
        .map(|arglist| {
            let mut cursor = arglist.walk();
            arglist.named_children(&mut cursor).map(|a| lower_expr(ctx, &a)).collect()
        })
        .unwrap_or_default();
    Ir::new(
        ctx.synthetic_id(node, "new"),
        ctx.span(node),
        IrKind::Call { callee: Box::new(callee), args, intrinsic: None, higher_order_kind: None, format_fragments: Vec::new(), is_suspension_point: false },
    )
}

fn lower_field_access(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("object").map(|o| lower_expr(ctx, &o)).unwrap_or_else(|| ctx.name_node(node, "<obj>"));
    let attr = node.child_by_field_name("field").map(|a| ctx.text(&a).to_string()).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "attr"), ctx.span(node), IrKind::Attribute { value: Box::new(value), attr })
}

fn lower_array_access(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("array").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<arr>"));
    let index = node.child_by_field_name("index").map(|i| lower_expr(ctx, &i)).unwrap_or_else(|| ctx.name_node(node, "<index>"));
    Ir::new(ctx.synthetic_id(node, "subscript"), ctx.span(node), IrKind::Subscript { value: Box::new(value), index: Box::new(index) })
}

fn lower_binary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let left = node.child_by_field_name("left").map(|l| lower_expr(ctx, &l)).unwrap_or_else(|| ctx.name_node(node, "<lhs>"));
    let right = node.child_by_field_name("right").map(|r| lower_expr(ctx, &r)).unwrap_or_else(|| ctx.name_node(node, "<rhs>"));
    let op_text = node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
    let op = java_binary_operator(&op_text);
    Ir::new(ctx.synthetic_id(node, "binop"), ctx.span(node), IrKind::BinaryOp { op, left: Box::new(left), right: Box::new(right) })
}

fn java_binary_operator(text: &str) -> Operator {
    match text {
        "+" => Operator::Add,
        "-" => Operator::Sub,
        "*" => Operator::Mul,
        "/" => Operator::Div,
        "%" => Operator::Mod,
        "==" => Operator::Eq,
        "!=" => Operator::Ne,
        "<" => Operator::Lt,
        "<=" => Operator::Le,
        ">" => Operator::Gt,
        ">=" => Operator::Ge,
        "&&" => Operator::And,
        "||" => Operator::Or,
        "&" => Operator::BitAnd,
        "|" => Operator::BitOr,
        "^" => Operator::BitXor,
        "<<" => Operator::Shl,
        ">>" | ">>>" => Operator::Shr,
        "instanceof" => Operator::Is,
        _ => Operator::Eq,
    }
}

fn lower_unary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let operand = node.child_by_field_name("operand").map(|a| lower_expr(ctx, &a)).unwrap_or_else(|| ctx.name_node(node, "<operand>"));
    let op = match node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).as_deref() {
        Some("-") => Operator::Sub,
        Some("!") => Operator::Not,
        _ => Operator::Not,
    };
    Ir::new(ctx.synthetic_id(node, "unop"), ctx.span(node), IrKind::UnaryOp { op, operand: Box::new(operand) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Ir {
        JavaFrontend.lower(source, "T.java").unwrap().root
    }

    #[test]
    fn lowers_class_with_method() {
        let root = lower("class T {\n  int add(int a, int b) {\n    return a + b;\n  }\n}\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                match &body[0].kind {
                    IrKind::ClassDef { name, body, .. } => {
                        assert_eq!(name, "T");
                        assert_eq!(body.len(), 1);
                    }
                    other => panic!("expected ClassDef, got {other:?}"),
                }
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn string_format_call_is_tagged_intrinsic() {
        let root = lower("class T {\n  String f() {\n    return String.format(\"%d\", 1);\n  }\n}\n");
        let method = match &root.kind {
            IrKind::Module { body } => match &body[0].kind {
                IrKind::ClassDef { body, .. } => &body[0],
                _ => unreachable!(),
            },
            _ => unreachable!(),
        };
        let ret = match &method.kind {
            IrKind::FunctionDef { body, .. } => &body[0],
            _ => unreachable!(),
        };
        match &ret.kind {
            IrKind::Return { value: Some(value) } => {
                assert!(matches!(&value.kind, IrKind::Call { intrinsic: Some(i), .. } if i == "format"));
            }
            other => panic!("expected Return, got {other:?}"),
        }
    }

    #[test]
    fn stream_pipeline_is_tagged_higher_order() {
        let root = lower("class T {\n  void f() {\n    xs.stream().map(x -> x);\n  }\n}\n");
        let method = match &root.kind {
            IrKind::Module { body } => match &body[0].kind {
                IrKind::ClassDef { body, .. } => &body[0],
                _ => unreachable!(),
            },
            _ => unreachable!(),
        };
        let stmt = match &method.kind {
            IrKind::FunctionDef { body, .. } => &body[0],
            _ => unreachable!(),
        };
        match &stmt.kind {
            IrKind::ExprStmt { expr } => {
                assert!(matches!(&expr.kind, IrKind::Call { higher_order_kind: Some(HigherOrderKind::Map), .. }));
            }
            other => panic!("expected ExprStmt, got {other:?}"),
        }
    }
}

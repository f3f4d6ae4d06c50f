//! Python frontend (spec.md §4.2).
//!
//! Lowers a `tree-sitter-python` parse tree into the shared IR. Augmented
//! assignment desugars to a plain `Assign` wrapping a `BinaryOp`; list/set/
//! dict comprehensions and generator expressions collapse to a single
//! `Call(higher_order_kind=Comprehension, ...)` whose sole argument is the
//! synthesized body function; f-strings desugar to
//! `Call(intrinsic="format", format_fragments=[...])`.

use tree_sitter::Node as TsNode;

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::domain::ImportStatement;
use crate::features::parsing::infrastructure::lowering::LoweringCtx;
use crate::features::parsing::ports::{FrontendOutput, LanguageFrontend};
use crate::shared::ir::{
    Diagnostic, ExceptHandler, FormatFragment, HigherOrderKind, Ir, IrKind, LiteralKind, Operator,
};
use crate::shared::ports::Language;

pub struct PythonFrontend;

impl LanguageFrontend for PythonFrontend {
    fn language(&self) -> Language {
        Language::Python
    }

    fn lower(&self, source: &str, relative_path: &str) -> Result<FrontendOutput> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .map_err(|e| ScalpelError::parse(format!("python grammar init failed: {e}")))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ScalpelError::parse("python parser produced no tree"))?;

        let mut ctx = LoweringCtx::new(Language::Python, relative_path, source);
        let mut diagnostics = Vec::new();
        collect_parse_errors(&tree.root_node(), &ctx, &mut diagnostics);

        let root_node = tree.root_node();
        let body = lower_block(&mut ctx, &root_node);
        let root = Ir::new(ctx.id(&root_node, "<module>"), ctx.span(&root_node), IrKind::Module { body });
        let imports = std::mem::take(&mut ctx.imports);
        Ok(FrontendOutput { root, diagnostics, imports })
    }
}

fn collect_parse_errors(node: &TsNode, ctx: &LoweringCtx, out: &mut Vec<Diagnostic>) {
    if node.is_error() || node.is_missing() {
        out.push(Diagnostic::error("PY001", format!("parse error near '{}'", node.kind()), Some(ctx.span(node))));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_parse_errors(&child, ctx, out);
    }
}

/// Lower every named statement child of `node` in document order.
fn lower_block(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).filter_map(|child| lower_statement(ctx, &child)).collect()
}

fn lower_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Option<Ir> {
    match node.kind() {
        "function_definition" => Some(lower_function_def(ctx, node)),
        "class_definition" => Some(lower_class_def(ctx, node)),
        "expression_statement" => lower_expr_statement(ctx, node),
        "if_statement" => Some(lower_if(ctx, node)),
        "while_statement" => Some(lower_while(ctx, node)),
        "for_statement" => Some(lower_for(ctx, node)),
        "try_statement" => Some(lower_try(ctx, node)),
        "return_statement" => Some(lower_return(ctx, node)),
        "raise_statement" => Some(lower_raise(ctx, node)),
        "break_statement" => Some(Ir::new(ctx.synthetic_id(node, "break"), ctx.span(node), IrKind::Break)),
        "continue_statement" => Some(Ir::new(ctx.synthetic_id(node, "continue"), ctx.span(node), IrKind::Continue)),
        "pass_statement" => Some(ctx.pass_node(node)),
        "decorated_definition" => node.named_child(node.named_child_count().saturating_sub(1)).and_then(|inner| lower_statement(ctx, &inner)),
        "comment" => None,
        "import_statement" => Some(lower_import(ctx, node)),
        "import_from_statement" => Some(lower_import_from(ctx, node)),
        _ => Some(lower_opaque_statement(ctx, node)),
    }
}

/// `import a.b, c as d` — each name (or alias) introduces one local binding,
/// so it is recorded as its own [`ImportStatement`] (spec.md §4.3: cross-
/// module resolution consults one record per bound name).
fn lower_import(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => {
                let module = ctx.text(&child).to_string();
                ctx.record_import(ImportStatement {
                    span: ctx.span(&child),
                    module,
                    imported_name: None,
                    alias: None,
                    is_wildcard: false,
                });
            }
            "aliased_import" => {
                let module = child.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                let alias = child.child_by_field_name("alias").map(|n| ctx.text(&n).to_string());
                ctx.record_import(ImportStatement {
                    span: ctx.span(&child),
                    module,
                    imported_name: None,
                    alias,
                    is_wildcard: false,
                });
            }
            _ => {}
        }
    }
    lower_opaque_statement(ctx, node)
}

/// `from module import a, b as c` / `from module import *`.
fn lower_import_from(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let module = node
        .child_by_field_name("module_name")
        .map(|n| ctx.text(&n).to_string())
        .unwrap_or_default();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" if ctx.text(&child) != module => {
                ctx.record_import(ImportStatement {
                    span: ctx.span(&child),
                    module: module.clone(),
                    imported_name: Some(ctx.text(&child).to_string()),
                    alias: None,
                    is_wildcard: false,
                });
            }
            "aliased_import" => {
                let name = child.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                let alias = child.child_by_field_name("alias").map(|n| ctx.text(&n).to_string());
                ctx.record_import(ImportStatement {
                    span: ctx.span(&child),
                    module: module.clone(),
                    imported_name: Some(name),
                    alias,
                    is_wildcard: false,
                });
            }
            "wildcard_import" => {
                ctx.record_import(ImportStatement {
                    span: ctx.span(&child),
                    module: module.clone(),
                    imported_name: None,
                    alias: None,
                    is_wildcard: true,
                });
            }
            _ => {}
        }
    }
    lower_opaque_statement(ctx, node)
}

fn lower_opaque_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut cursor = node.walk();
    let children: Vec<Ir> = node
        .named_children(&mut cursor)
        .filter_map(|child| lower_statement(ctx, &child).or_else(|| Some(lower_expr(ctx, &child))))
        .collect();
    ctx.opaque_node(node, children)
}

fn lower_function_def(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let is_async = {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "async")
    };
    let params = node
        .child_by_field_name("parameters")
        .map(|p| lower_params(ctx, &p))
        .unwrap_or_default();
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();

    Ir::new(
        ctx.id(node, &name),
        ctx.span(node),
        IrKind::FunctionDef { name, params, body, is_async, higher_order_kind: None },
    )
}

fn lower_params(ctx: &mut LoweringCtx, params_node: &TsNode) -> Vec<Ir> {
    let mut cursor = params_node.walk();
    params_node
        .named_children(&mut cursor)
        .filter_map(|p| match p.kind() {
            "identifier" => {
                let name = ctx.text(&p).to_string();
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None }))
            }
            "typed_parameter" => {
                let name = p.named_child(0).map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None }))
            }
            "default_parameter" | "typed_default_parameter" => {
                let name = p.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                let default = p.child_by_field_name("value").map(|v| Box::new(lower_expr(ctx, &v)));
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default }))
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let name = ctx.text(&p).to_string();
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None }))
            }
            _ => None,
        })
        .collect()
}

fn lower_class_def(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let bases = node
        .child_by_field_name("superclasses")
        .map(|arglist| {
            let mut cursor = arglist.walk();
            arglist.named_children(&mut cursor).map(|a| lower_expr(ctx, &a)).collect()
        })
        .unwrap_or_default();
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.id(node, &name), ctx.span(node), IrKind::ClassDef { name, bases, body })
}

fn lower_expr_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Option<Ir> {
    let inner = node.named_child(0)?;
    match inner.kind() {
        "assignment" => Some(lower_assignment(ctx, &inner)),
        "augmented_assignment" => Some(lower_augmented_assignment(ctx, &inner)),
        _ => {
            let expr = lower_expr(ctx, &inner);
            Some(Ir::new(ctx.synthetic_id(node, "exprstmt"), ctx.span(node), IrKind::ExprStmt { expr: Box::new(expr) }))
        }
    }
}

fn lower_assignment(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let target = node.child_by_field_name("left").map(|t| lower_expr(ctx, &t)).unwrap_or_else(|| ctx.name_node(node, "<target>"));
    let value = node.child_by_field_name("right").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<missing>"));
    Ir::new(ctx.synthetic_id(node, "assign"), ctx.span(node), IrKind::Assign { target: Box::new(target), value: Box::new(value) })
}

/// `x += y` desugars to `x = x + y` (one of the normalization rules every
/// frontend applies so the taint engine only has to understand `Assign`).
fn lower_augmented_assignment(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let target = node.child_by_field_name("left").map(|t| lower_expr(ctx, &t)).unwrap_or_else(|| ctx.name_node(node, "<target>"));
    let rhs = node.child_by_field_name("right").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<missing>"));
    let op_text = node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
    let op = augmented_operator(&op_text);
    let binop = Ir::new(
        ctx.synthetic_id(node, "augop"),
        ctx.span(node),
        IrKind::BinaryOp { op, left: Box::new(target.clone()), right: Box::new(rhs) },
    );
    Ir::new(ctx.synthetic_id(node, "assign"), ctx.span(node), IrKind::Assign { target: Box::new(target), value: Box::new(binop) })
}

fn augmented_operator(text: &str) -> Operator {
    match text {
        "+=" => Operator::Add,
        "-=" => Operator::Sub,
        "*=" => Operator::Mul,
        "/=" | "//=" => Operator::Div,
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
    let body = node.child_by_field_name("consequence").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    let mut orelse = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "elif_clause" => orelse.push(lower_elif(ctx, &child)),
            "else_clause" => {
                if let Some(b) = child.child_by_field_name("body") {
                    orelse.extend(lower_block(ctx, &b));
                }
            }
            _ => {}
        }
    }
    Ir::new(ctx.synthetic_id(node, "if"), ctx.span(node), IrKind::If { test: Box::new(test), body, orelse })
}

fn lower_elif(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let test = node.child_by_field_name("condition").map(|c| lower_expr(ctx, &c)).unwrap_or_else(|| ctx.name_node(node, "<cond>"));
    let body = node.child_by_field_name("consequence").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    let mut orelse = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "elif_clause" => orelse.push(lower_elif(ctx, &child)),
            "else_clause" => {
                if let Some(b) = child.child_by_field_name("body") {
                    orelse.extend(lower_block(ctx, &b));
                }
            }
            _ => {}
        }
    }
    Ir::new(ctx.synthetic_id(node, "elif"), ctx.span(node), IrKind::If { test: Box::new(test), body, orelse })
}

fn lower_while(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let test = node.child_by_field_name("condition").map(|c| lower_expr(ctx, &c)).unwrap_or_else(|| ctx.name_node(node, "<cond>"));
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "while"), ctx.span(node), IrKind::While { test: Box::new(test), body })
}

fn lower_for(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let item = node.child_by_field_name("left").map(|l| lower_expr(ctx, &l)).unwrap_or_else(|| ctx.name_node(node, "<item>"));
    let iter = node.child_by_field_name("right").map(|r| lower_expr(ctx, &r)).unwrap_or_else(|| ctx.name_node(node, "<iter>"));
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "for"), ctx.span(node), IrKind::For { item: Box::new(item), iter: Box::new(iter), body })
}

fn lower_try(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut body = Vec::new();
    let mut handlers = Vec::new();
    let mut finalizer = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "block" => body.extend(lower_block(ctx, &child)),
            "except_clause" => handlers.push(lower_except(ctx, &child)),
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

fn lower_except(ctx: &mut LoweringCtx, node: &TsNode) -> ExceptHandler {
    let mut exception_type = None;
    let mut var = None;
    let mut body = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block" => body.extend(lower_block(ctx, &child)),
            "as_pattern" => {
                exception_type = child.named_child(0).map(|n| ctx.text(&n).to_string());
                var = child.named_child(1).map(|n| ctx.text(&n).to_string());
            }
            "identifier" | "attribute" if exception_type.is_none() => {
                exception_type = Some(ctx.text(&child).to_string());
            }
            _ => {}
        }
    }
    ExceptHandler { exception_type, var, body }
}

fn lower_return(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "return"), ctx.span(node), IrKind::Return { value })
}

fn lower_raise(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "raise"), ctx.span(node), IrKind::Raise { value })
}

fn lower_expr(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    match node.kind() {
        "identifier" => {
            let id = ctx.text(node).to_string();
            Ir::new(ctx.id(node, &id), ctx.span(node), IrKind::Name { id })
        }
        "integer" => ctx.literal_node(node, LiteralKind::Int),
        "float" => ctx.literal_node(node, LiteralKind::Float),
        "true" => ctx.literal_node(node, LiteralKind::Bool),
        "false" => ctx.literal_node(node, LiteralKind::Bool),
        "none" => ctx.literal_node(node, LiteralKind::None),
        "string" => lower_string(ctx, node),
        "call" => lower_call(ctx, node),
        "attribute" => lower_attribute(ctx, node),
        "subscript" => lower_subscript(ctx, node),
        "binary_operator" | "comparison_operator" | "boolean_operator" => lower_binary(ctx, node),
        "unary_operator" | "not_operator" => lower_unary(ctx, node),
        "list_comprehension" | "set_comprehension" | "dictionary_comprehension" | "generator_expression" => {
            lower_comprehension(ctx, node)
        }
        "await" => lower_await(ctx, node),
        "parenthesized_expression" => node.named_child(0).map(|inner| lower_expr(ctx, &inner)).unwrap_or_else(|| ctx.name_node(node, "<empty>")),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<Ir> = node.named_children(&mut cursor).map(|c| lower_expr(ctx, &c)).collect();
            ctx.opaque_node(node, children)
        }
    }
}

/// f-strings lower to `Call(intrinsic="format", ...)` with one
/// [`FormatFragment`] per literal run / `{expr}` interpolation.
fn lower_string(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut cursor = node.walk();
    let interpolations: Vec<TsNode> = node.named_children(&mut cursor).filter(|c| c.kind() == "interpolation").collect();
    if interpolations.is_empty() {
        return ctx.literal_node(node, LiteralKind::String);
    }

    let mut fragments = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "interpolation" {
            if let Some(expr) = child.named_child(0) {
                fragments.push(FormatFragment::Expr(Box::new(lower_expr(ctx, &expr))));
            }
        } else if !child.kind().starts_with('"') && !child.kind().starts_with('\'') && child.kind() != "f"
            && child.kind() != "escape_sequence"
        {
            let text = ctx.text(&child).to_string();
            if !text.is_empty() {
                fragments.push(FormatFragment::Literal(text));
            }
        }
    }

    let callee = Ir::new(ctx.synthetic_id(node, "format_fn"), ctx.span(node), IrKind::Name { id: "format".to_string() });
    Ir::new(
        ctx.synthetic_id(node, "format"),
        ctx.span(node),
        IrKind::Call {
            callee: Box::new(callee),
            args: Vec::new(),
            intrinsic: Some("format".to_string()),
            higher_order_kind: None,
            format_fragments: fragments,
            is_suspension_point: false,
        },
    )
}

fn lower_call(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let callee = node.child_by_field_name("function").map(|f| lower_expr(ctx, &f)).unwrap_or_else(|| ctx.name_node(node, "<callee>"));
    let args = node
        .child_by_field_name("arguments")
        .map(|arglist| {
            let mut cursor = arglist.walk();
            arglist.named_children(&mut cursor).map(|a| lower_expr(ctx, &a)).collect()
        })
        .unwrap_or_default();
    Ir::new(
        ctx.synthetic_id(node, "call"),
        ctx.span(node),
        IrKind::Call {
            callee: Box::new(callee),
            args,
            intrinsic: None,
            higher_order_kind: None,
            format_fragments: Vec::new(),
            is_suspension_point: false,
        },
    )
}

fn lower_attribute(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("object").map(|o| lower_expr(ctx, &o)).unwrap_or_else(|| ctx.name_node(node, "<obj>"));
    let attr = node.child_by_field_name("attribute").map(|a| ctx.text(&a).to_string()).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "attr"), ctx.span(node), IrKind::Attribute { value: Box::new(value), attr })
}

fn lower_subscript(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("value").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<obj>"));
    let index = node.child_by_field_name("subscript").map(|i| lower_expr(ctx, &i)).unwrap_or_else(|| ctx.name_node(node, "<index>"));
    Ir::new(ctx.synthetic_id(node, "subscript"), ctx.span(node), IrKind::Subscript { value: Box::new(value), index: Box::new(index) })
}

fn lower_binary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let left = node.child_by_field_name("left").map(|l| lower_expr(ctx, &l)).unwrap_or_else(|| ctx.name_node(node, "<lhs>"));
    let right = node.child_by_field_name("right").map(|r| lower_expr(ctx, &r)).unwrap_or_else(|| ctx.name_node(node, "<rhs>"));
    let op_text = node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
    let op = python_binary_operator(&op_text);
    Ir::new(ctx.synthetic_id(node, "binop"), ctx.span(node), IrKind::BinaryOp { op, left: Box::new(left), right: Box::new(right) })
}

fn python_binary_operator(text: &str) -> Operator {
    match text {
        "+" => Operator::Add,
        "-" => Operator::Sub,
        "*" => Operator::Mul,
        "/" | "//" => Operator::Div,
        "%" => Operator::Mod,
        "==" => Operator::Eq,
        "!=" => Operator::Ne,
        "<" => Operator::Lt,
        "<=" => Operator::Le,
        ">" => Operator::Gt,
        ">=" => Operator::Ge,
        "and" => Operator::And,
        "or" => Operator::Or,
        "&" => Operator::BitAnd,
        "|" => Operator::BitOr,
        "^" => Operator::BitXor,
        "<<" => Operator::Shl,
        ">>" => Operator::Shr,
        "in" => Operator::In,
        "is" => Operator::Is,
        _ => Operator::Eq,
    }
}

fn lower_unary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let operand = node.child_by_field_name("argument").map(|a| lower_expr(ctx, &a)).unwrap_or_else(|| ctx.name_node(node, "<operand>"));
    let op = if node.kind() == "not_operator" {
        Operator::Not
    } else {
        match node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).as_deref() {
            Some("-") => Operator::Sub,
            _ => Operator::Not,
        }
    };
    Ir::new(ctx.synthetic_id(node, "unop"), ctx.span(node), IrKind::UnaryOp { op, operand: Box::new(operand) })
}

/// Comprehensions and generator expressions collapse to a single call
/// annotated `HigherOrderKind::Comprehension` whose body is a synthesized
/// zero-arg function (spec.md §4.2: "the lambda/closure body is represented
/// as a nested FunctionDef passed as one of the call's arguments").
fn lower_comprehension(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let body_expr = node.named_child(0).map(|b| lower_expr(ctx, &b)).unwrap_or_else(|| ctx.name_node(node, "<body>"));
    let body_fn = Ir::new(
        ctx.synthetic_id(node, "comprehension_body"),
        ctx.span(node),
        IrKind::FunctionDef {
            name: "<comprehension>".to_string(),
            params: Vec::new(),
            body: vec![Ir::new(ctx.synthetic_id(node, "return"), ctx.span(node), IrKind::Return { value: Some(Box::new(body_expr)) })],
            is_async: false,
            higher_order_kind: Some(HigherOrderKind::Comprehension),
        },
    );

    let mut cursor = node.walk();
    let iterables: Vec<Ir> = node
        .named_children(&mut cursor)
        .skip(1)
        .filter(|c| c.kind() == "for_in_clause")
        .filter_map(|clause| clause.child_by_field_name("right").map(|r| lower_expr(ctx, &r)))
        .collect();

    let callee = Ir::new(ctx.synthetic_id(node, "comprehension_fn"), ctx.span(node), IrKind::Name { id: "<comprehension>".to_string() });
    let mut args = vec![body_fn];
    args.extend(iterables);

    Ir::new(
        ctx.synthetic_id(node, "comprehension_call"),
        ctx.span(node),
        IrKind::Call {
            callee: Box::new(callee),
            args,
            intrinsic: None,
            higher_order_kind: Some(HigherOrderKind::Comprehension),
            format_fragments: Vec::new(),
            is_suspension_point: false,
        },
    )
}

/// `await expr` stays a `Call` to the awaited expression with
/// `is_suspension_point` set — spec.md §4.2 collapses async control flow to
/// synchronous IR, keeping only this flag as the suspension marker.
fn lower_await(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let inner = node.named_child(0).map(|i| lower_expr(ctx, &i)).unwrap_or_else(|| ctx.name_node(node, "<awaited>"));
    if let IrKind::Call { callee, args, intrinsic, higher_order_kind, format_fragments, .. } = inner.kind {
        return Ir::new(
            inner.node_id,
            inner.span,
            IrKind::Call { callee, args, intrinsic, higher_order_kind, format_fragments, is_suspension_point: true },
        );
    }
    Ir::new(
        ctx.synthetic_id(node, "await"),
        ctx.span(node),
        IrKind::Call {
            callee: Box::new(inner),
            args: Vec::new(),
            intrinsic: Some("await".to_string()),
            higher_order_kind: None,
            format_fragments: Vec::new(),
            is_suspension_point: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Ir {
        PythonFrontend.lower(source, "t.py").unwrap().root
    }

    #[test]
    fn lowers_function_with_params_and_return() {
        let root = lower("def add(a, b=1):\n    return a + b\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                match &body[0].kind {
                    IrKind::FunctionDef { name, params, body, .. } => {
                        assert_eq!(name, "add");
                        assert_eq!(params.len(), 2);
                        assert_eq!(body.len(), 1);
                    }
                    other => panic!("expected FunctionDef, got {other:?}"),
                }
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }

    #[test]
    fn augmented_assignment_desugars_to_assign_of_binaryop() {
        let root = lower("x += 1\n");
        let stmt = match &root.kind {
            IrKind::Module { body } => &body[0],
            _ => unreachable!(),
        };
        match &stmt.kind {
            IrKind::Assign { value, .. } => {
                assert!(matches!(value.kind, IrKind::BinaryOp { op: Operator::Add, .. }));
            }
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn fstring_desugars_to_format_call() {
        let root = lower("x = f'hello {name}'\n");
        let stmt = match &root.kind {
            IrKind::Module { body } => &body[0],
            _ => unreachable!(),
        };
        match &stmt.kind {
            IrKind::Assign { value, .. } => match &value.kind {
                IrKind::Call { intrinsic, format_fragments, .. } => {
                    assert_eq!(intrinsic.as_deref(), Some("format"));
                    assert!(!format_fragments.is_empty());
                }
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn list_comprehension_marks_higher_order_kind() {
        let root = lower("y = [x for x in items]\n");
        let stmt = match &root.kind {
            IrKind::Module { body } => &body[0],
            _ => unreachable!(),
        };
        match &stmt.kind {
            IrKind::Assign { value, .. } => match &value.kind {
                IrKind::Call { higher_order_kind, .. } => {
                    assert_eq!(*higher_order_kind, Some(HigherOrderKind::Comprehension));
                }
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn records_imports_for_cross_module_resolution() {
        let output = PythonFrontend.lower("import os\nfrom flask import request\n", "a.py").unwrap();
        assert_eq!(output.imports.len(), 2);
        assert_eq!(output.imports[0].module, "os");
        assert_eq!(output.imports[1].module, "flask");
        assert_eq!(output.imports[1].imported_name.as_deref(), Some("request"));
    }

    #[test]
    fn totality_every_top_level_construct_lowers_to_something() {
        let root = lower("try:\n    pass\nexcept ValueError as e:\n    pass\nfinally:\n    pass\n");
        match &root.kind {
            IrKind::Module { body } => {
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0].kind, IrKind::Try { .. }));
            }
            other => panic!("expected Module, got {other:?}"),
        }
    }
}

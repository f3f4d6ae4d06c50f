//! Shared ECMAScript lowering (spec.md §4.2), used by both the JavaScript
//! and TypeScript frontends — `tree-sitter-javascript` and
//! `tree-sitter-typescript` agree on node kinds for the common core, so one
//! lowering pass serves both grammars. TypeScript-only syntax (interfaces,
//! type annotations, `as` casts) that has no IR counterpart collapses to
//! `Opaque`.

use tree_sitter::Node as TsNode;

use crate::features::parsing::domain::ImportStatement;
use crate::features::parsing::infrastructure::lowering::LoweringCtx;
use crate::shared::ir::{Diagnostic, ExceptHandler, FormatFragment, HigherOrderKind, Ir, IrKind, LiteralKind, Operator};

pub fn collect_parse_errors(node: &TsNode, ctx: &LoweringCtx, out: &mut Vec<Diagnostic>, code: &'static str) {
    if node.is_error() || node.is_missing() {
        out.push(Diagnostic::error(code, format!("parse error near '{}'", node.kind()), Some(ctx.span(node))));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_parse_errors(&child, ctx, out, code);
    }
}

pub fn lower_block(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).flat_map(|child| lower_statement(ctx, &child)).collect()
}

/// Returns zero or more IR statements — multi-declarator `var`/`let`/`const`
/// statements expand to one `VariableDecl` per declarator.
fn lower_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Vec<Ir> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => vec![lower_function(ctx, node)],
        "class_declaration" => vec![lower_class(ctx, node)],
        "lexical_declaration" | "variable_declaration" => lower_variable_declaration(ctx, node),
        "expression_statement" => node.named_child(0).map(|e| lower_expr_statement(ctx, node, &e)).into_iter().collect(),
        "if_statement" => vec![lower_if(ctx, node)],
        "while_statement" => vec![lower_while(ctx, node)],
        "for_in_statement" => vec![lower_for_in(ctx, node)],
        "for_statement" => vec![lower_c_style_for(ctx, node)],
        "try_statement" => vec![lower_try(ctx, node)],
        "return_statement" => vec![lower_return(ctx, node)],
        "throw_statement" => vec![lower_throw(ctx, node)],
        "break_statement" => vec![Ir::new(ctx.synthetic_id(node, "break"), ctx.span(node), IrKind::Break)],
        "continue_statement" => vec![Ir::new(ctx.synthetic_id(node, "continue"), ctx.span(node), IrKind::Continue)],
        "empty_statement" | "comment" => vec![],
        "import_statement" => {
            lower_import(ctx, node);
            vec![]
        }
        _ => vec![lower_opaque_statement(ctx, node)],
    }
}

/// `import x from "mod"` / `import {a, b as c} from "mod"` / `import * as ns
/// from "mod"` (spec.md §4.3: one [`ImportStatement`] per local binding).
fn lower_import(ctx: &mut LoweringCtx, node: &TsNode) {
    let module = node.child_by_field_name("source").map(|s| ctx.text(&s).trim_matches(['"', '\'']).to_string()).unwrap_or_default();
    let mut top_cursor = node.walk();
    let Some(clause) = node.named_children(&mut top_cursor).find(|c| c.kind() == "import_clause") else { return };
    let mut cursor = clause.walk();
    for part in clause.named_children(&mut cursor) {
        match part.kind() {
            "identifier" => {
                ctx.record_import(ImportStatement {
                    span: ctx.span(&part),
                    module: module.clone(),
                    imported_name: None,
                    alias: Some(ctx.text(&part).to_string()),
                    is_wildcard: false,
                });
            }
            "namespace_import" => {
                let alias = part.named_child(0).map(|n| ctx.text(&n).to_string());
                ctx.record_import(ImportStatement {
                    span: ctx.span(&part),
                    module: module.clone(),
                    imported_name: None,
                    alias,
                    is_wildcard: true,
                });
            }
            "named_imports" => {
                let mut inner_cursor = part.walk();
                for spec in part.named_children(&mut inner_cursor) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let name = spec.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                    let alias = spec.child_by_field_name("alias").map(|n| ctx.text(&n).to_string());
                    ctx.record_import(ImportStatement {
                        span: ctx.span(&spec),
                        module: module.clone(),
                        imported_name: Some(name),
                        alias,
                        is_wildcard: false,
                    });
                }
            }
            _ => {}
        }
    }
}

fn lower_opaque_statement(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut cursor = node.walk();
    let children: Vec<Ir> = node.named_children(&mut cursor).flat_map(|c| lower_statement(ctx, &c)).collect();
    ctx.opaque_node(node, children)
}

fn lower_function(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let is_async = {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "async")
    };
    let params = node.child_by_field_name("parameters").map(|p| lower_params(ctx, &p)).unwrap_or_default();
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.id(node, &name), ctx.span(node), IrKind::FunctionDef { name, params, body, is_async, higher_order_kind: None })
}

fn lower_params(ctx: &mut LoweringCtx, params_node: &TsNode) -> Vec<Ir> {
    let mut cursor = params_node.walk();
    params_node
        .named_children(&mut cursor)
        .filter_map(|p| match p.kind() {
            "identifier" | "required_parameter" | "rest_pattern" => {
                let name_node = p.named_child(0).unwrap_or(p);
                let name = ctx.text(&name_node).to_string();
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None }))
            }
            "assignment_pattern" => {
                let name = p.child_by_field_name("left").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                let default = p.child_by_field_name("right").map(|v| Box::new(lower_expr(ctx, &v)));
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default }))
            }
            _ => {
                let name = ctx.text(&p).to_string();
                Some(Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None }))
            }
        })
        .collect()
}

fn lower_class(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let name = node.child_by_field_name("name").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
    let bases = node
        .child_by_field_name("heritage")
        .map(|h| {
            let mut cursor = h.walk();
            h.named_children(&mut cursor).map(|b| lower_expr(ctx, &b)).collect()
        })
        .unwrap_or_default();
    let body = node
        .child_by_field_name("body")
        .map(|b| {
            let mut cursor = b.walk();
            b.named_children(&mut cursor)
                .filter_map(|member| match member.kind() {
                    "method_definition" => Some(lower_function(ctx, &member)),
                    "field_definition" | "public_field_definition" => {
                        let field_name = member.child_by_field_name("property").map(|n| ctx.text(&n).to_string()).unwrap_or_default();
                        let value = member.child_by_field_name("value").map(|v| Box::new(lower_expr(ctx, &v)));
                        Some(Ir::new(ctx.id(&member, &field_name), ctx.span(&member), IrKind::VariableDecl { name: field_name, value }))
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    Ir::new(ctx.id(node, &name), ctx.span(node), IrKind::ClassDef { name, bases, body })
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
    match inner.kind() {
        "assignment_expression" => lower_assignment(ctx, inner),
        "augmented_assignment_expression" => lower_augmented_assignment(ctx, inner),
        _ => {
            let expr = lower_expr(ctx, inner);
            Ir::new(ctx.synthetic_id(stmt, "exprstmt"), ctx.span(stmt), IrKind::ExprStmt { expr: Box::new(expr) })
        }
    }
}

fn lower_assignment(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let target = node.child_by_field_name("left").map(|t| lower_expr(ctx, &t)).unwrap_or_else(|| ctx.name_node(node, "<target>"));
    let value = node.child_by_field_name("right").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<missing>"));
    Ir::new(ctx.synthetic_id(node, "assign"), ctx.span(node), IrKind::Assign { target: Box::new(target), value: Box::new(value) })
}

fn lower_augmented_assignment(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let target = node.child_by_field_name("left").map(|t| lower_expr(ctx, &t)).unwrap_or_else(|| ctx.name_node(node, "<target>"));
    let rhs = node.child_by_field_name("right").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<missing>"));
    let op_text = node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
    let op = js_augmented_operator(&op_text);
    let binop = Ir::new(
        ctx.synthetic_id(node, "augop"),
        ctx.span(node),
        IrKind::BinaryOp { op, left: Box::new(target.clone()), right: Box::new(rhs) },
    );
    Ir::new(ctx.synthetic_id(node, "assign"), ctx.span(node), IrKind::Assign { target: Box::new(target), value: Box::new(binop) })
}

fn js_augmented_operator(text: &str) -> Operator {
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
        .map(|b| if b.kind() == "statement_block" { lower_block(ctx, &b) } else { lower_statement(ctx, &b) })
        .unwrap_or_default();
    let orelse = node
        .child_by_field_name("alternative")
        .map(|alt| match alt.kind() {
            "statement_block" => lower_block(ctx, &alt),
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

fn lower_for_in(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let item = node.child_by_field_name("left").map(|l| lower_expr(ctx, &l)).unwrap_or_else(|| ctx.name_node(node, "<item>"));
    let iter = node.child_by_field_name("right").map(|r| lower_expr(ctx, &r)).unwrap_or_else(|| ctx.name_node(node, "<iter>"));
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "for"), ctx.span(node), IrKind::For { item: Box::new(item), iter: Box::new(iter), body })
}

/// C-style `for (init; test; update)` has no `For` IR counterpart (that
/// variant models only `for..in`/`for..of`); it collapses to `Opaque` with
/// the lowered init/test/update/body kept as children so no bytes are lost.
fn lower_c_style_for(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut children = Vec::new();
    if let Some(init) = node.child_by_field_name("initializer") {
        children.extend(lower_statement(ctx, &init));
    }
    if let Some(cond) = node.child_by_field_name("condition") {
        children.push(lower_expr(ctx, &cond));
    }
    if let Some(update) = node.child_by_field_name("increment") {
        children.push(lower_expr(ctx, &update));
    }
    if let Some(body) = node.child_by_field_name("body") {
        children.extend(lower_block(ctx, &body));
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
    let var = node.child_by_field_name("parameter").map(|n| ctx.text(&n).to_string());
    let body = node.child_by_field_name("body").map(|b| lower_block(ctx, &b)).unwrap_or_default();
    ExceptHandler { exception_type: None, var, body }
}

fn lower_return(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "return"), ctx.span(node), IrKind::Return { value })
}

/// `throw` maps onto the shared `Raise` statement (spec.md §4.2: exception
/// constructs across languages normalize to the same two statement shapes).
fn lower_throw(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.named_child(0).map(|v| Box::new(lower_expr(ctx, &v)));
    Ir::new(ctx.synthetic_id(node, "raise"), ctx.span(node), IrKind::Raise { value })
}

const HIGHER_ORDER_METHODS: &[(&str, HigherOrderKind)] =
    &[("map", HigherOrderKind::Map), ("filter", HigherOrderKind::Filter), ("reduce", HigherOrderKind::Reduce)];

pub fn lower_expr(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    match node.kind() {
        "identifier" | "shorthand_property_identifier" | "this" => {
            let id = ctx.text(node).to_string();
            Ir::new(ctx.id(node, &id), ctx.span(node), IrKind::Name { id })
        }
        "number" => ctx.literal_node(node, LiteralKind::Int),
        "true" | "false" => ctx.literal_node(node, LiteralKind::Bool),
        "null" | "undefined" => ctx.literal_node(node, LiteralKind::None),
        "string" => ctx.literal_node(node, LiteralKind::String),
        "template_string" => lower_template_string(ctx, node),
        "call_expression" => lower_call(ctx, node),
        "member_expression" => lower_member(ctx, node),
        "subscript_expression" => lower_subscript(ctx, node),
        "binary_expression" => lower_binary(ctx, node),
        "unary_expression" => lower_unary(ctx, node),
        "arrow_function" => lower_arrow_function(ctx, node),
        "parenthesized_expression" => node.named_child(0).map(|inner| lower_expr(ctx, &inner)).unwrap_or_else(|| ctx.name_node(node, "<empty>")),
        "await_expression" => lower_await(ctx, node),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<Ir> = node.named_children(&mut cursor).map(|c| lower_expr(ctx, &c)).collect();
            ctx.opaque_node(node, children)
        }
    }
}

fn lower_arrow_function(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let is_async = {
        let mut cursor = node.walk();
        node.children(&mut cursor).any(|c| c.kind() == "async")
    };
    let params = match node.child_by_field_name("parameters") {
        Some(p) => lower_params(ctx, &p),
        None => node
            .child_by_field_name("parameter")
            .map(|p| {
                let name = ctx.text(&p).to_string();
                vec![Ir::new(ctx.id(&p, &name), ctx.span(&p), IrKind::Param { name, default: None })]
            })
            .unwrap_or_default(),
    };
    let body_node = node.child_by_field_name("body");
    let body = match &body_node {
        Some(b) if b.kind() == "statement_block" => lower_block(ctx, b),
        Some(b) => {
            let expr = lower_expr(ctx, b);
            vec![Ir::new(ctx.synthetic_id(b, "return"), ctx.span(b), IrKind::Return { value: Some(Box::new(expr)) })]
        }
        None => Vec::new(),
    };
    Ir::new(
        ctx.synthetic_id(node, "arrow"),
        ctx.span(node),
        IrKind::FunctionDef { name: "<arrow>".to_string(), params, body, is_async, higher_order_kind: None },
    )
}

fn lower_template_string(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let mut fragments = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "template_substitution" => {
                if let Some(expr) = child.named_child(0) {
                    fragments.push(FormatFragment::Expr(Box::new(lower_expr(ctx, &expr))));
                }
            }
            "string_fragment" => fragments.push(FormatFragment::Literal(ctx.text(&child).to_string())),
            _ => {}
        }
    }
    if fragments.is_empty() {
        return ctx.literal_node(node, LiteralKind::String);
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

/// `await expr` — see the Python frontend's `lower_await` for the shared
/// suspension-point convention.
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

/// `.map(fn)` / `.filter(fn)` / `.reduce(fn, init)` calls are annotated with
/// the matching `HigherOrderKind` (spec.md §4.2); every other call is a
/// plain `Call`.
fn lower_call(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let callee_node = node.child_by_field_name("function");
    let higher_order_kind = callee_node.as_ref().and_then(|c| {
        if c.kind() != "member_expression" {
            return None;
        }
        let prop = c.child_by_field_name("property")?;
        let prop_name = ctx.text(&prop);
        HIGHER_ORDER_METHODS.iter().find(|(m, _)| *m == prop_name).map(|(_, k)| *k)
    });
    let callee = callee_node.map(|f| lower_expr(ctx, &f)).unwrap_or_else(|| ctx.name_node(node, "<callee>"));
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
        IrKind::Call { callee: Box::new(callee), args, intrinsic: None, higher_order_kind, format_fragments: Vec::new(), is_suspension_point: false },
    )
}

fn lower_member(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("object").map(|o| lower_expr(ctx, &o)).unwrap_or_else(|| ctx.name_node(node, "<obj>"));
    let attr = node.child_by_field_name("property").map(|a| ctx.text(&a).to_string()).unwrap_or_default();
    Ir::new(ctx.synthetic_id(node, "attr"), ctx.span(node), IrKind::Attribute { value: Box::new(value), attr })
}

fn lower_subscript(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let value = node.child_by_field_name("object").map(|v| lower_expr(ctx, &v)).unwrap_or_else(|| ctx.name_node(node, "<obj>"));
    let index = node.child_by_field_name("index").map(|i| lower_expr(ctx, &i)).unwrap_or_else(|| ctx.name_node(node, "<index>"));
    Ir::new(ctx.synthetic_id(node, "subscript"), ctx.span(node), IrKind::Subscript { value: Box::new(value), index: Box::new(index) })
}

fn lower_binary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let left = node.child_by_field_name("left").map(|l| lower_expr(ctx, &l)).unwrap_or_else(|| ctx.name_node(node, "<lhs>"));
    let right = node.child_by_field_name("right").map(|r| lower_expr(ctx, &r)).unwrap_or_else(|| ctx.name_node(node, "<rhs>"));
    let op_text = node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).unwrap_or_default();
    let op = js_binary_operator(&op_text);
    Ir::new(ctx.synthetic_id(node, "binop"), ctx.span(node), IrKind::BinaryOp { op, left: Box::new(left), right: Box::new(right) })
}

fn js_binary_operator(text: &str) -> Operator {
    match text {
        "+" => Operator::Add,
        "-" => Operator::Sub,
        "*" => Operator::Mul,
        "/" => Operator::Div,
        "%" => Operator::Mod,
        "==" | "===" => Operator::Eq,
        "!=" | "!==" => Operator::Ne,
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
        "in" => Operator::In,
        "instanceof" => Operator::Is,
        _ => Operator::Eq,
    }
}

fn lower_unary(ctx: &mut LoweringCtx, node: &TsNode) -> Ir {
    let operand = node.child_by_field_name("argument").map(|a| lower_expr(ctx, &a)).unwrap_or_else(|| ctx.name_node(node, "<operand>"));
    let op = match node.child_by_field_name("operator").map(|o| ctx.text(&o).to_string()).as_deref() {
        Some("-") => Operator::Sub,
        Some("!") => Operator::Not,
        _ => Operator::Not,
    };
    Ir::new(ctx.synthetic_id(node, "unop"), ctx.span(node), IrKind::UnaryOp { op, operand: Box::new(operand) })
}

//! The statement-level taint walker (spec.md §4.5): propagates [`TaintInfo`]
//! through a function body, flags sink hits as [`Finding`]s, and — when an
//! [`InterproceduralContext`] is supplied — follows resolved call-graph
//! edges into callees up to the tier's depth/module budget.

use std::collections::HashSet;

use crate::features::taint_analysis::domain::taint::{
    Finding, FindingSeverity, SinkCategory, TaintInfo, TaintMap, TruncationReason,
};
use crate::features::taint_analysis::infrastructure::callee_path::callee_path;
use crate::features::taint_analysis::infrastructure::function_index::FunctionRef;
use crate::features::taint_analysis::infrastructure::registry::TaintConfig;
use crate::shared::callgraph::CallGraph;
use crate::shared::ids::NodeId;
use crate::shared::ir::{FormatFragment, Ir, IrKind};
use crate::shared::span::SourceSpan;

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_depth: u32,
    pub max_modules: u32,
}

pub struct InterproceduralContext<'a> {
    pub call_graph: &'a CallGraph,
    pub function_index: &'a std::collections::HashMap<NodeId, FunctionRef<'a>>,
    pub limits: Limits,
}

pub struct FunctionOutcome {
    pub return_taint: Option<TaintInfo>,
    pub findings: Vec<Finding>,
    pub truncated: bool,
    pub truncation_reason: Option<TruncationReason>,
}

struct Walk<'a> {
    registry: &'a TaintConfig,
    interprocedural: Option<&'a InterproceduralContext<'a>>,
    findings: Vec<Finding>,
    truncated: bool,
    truncation_reason: Option<TruncationReason>,
}

/// Entry point: analyze one function body, optionally chasing resolved
/// calls into other functions. `caller_node_id` must be the id under which
/// `ctx.call_graph` records this function's outgoing edges.
pub fn analyze_function(
    function: &Ir,
    caller_node_id: &str,
    incoming: TaintMap,
    registry: &TaintConfig,
    interprocedural: Option<&InterproceduralContext<'_>>,
    depth: u32,
    visited_modules: &HashSet<String>,
    chain_prefix: &[SourceSpan],
) -> FunctionOutcome {
    let IrKind::FunctionDef { body, .. } = &function.kind else {
        return FunctionOutcome { return_taint: None, findings: vec![], truncated: false, truncation_reason: None };
    };
    let mut walk = Walk { registry, interprocedural, findings: Vec::new(), truncated: false, truncation_reason: None };
    let mut taint_map = incoming;
    let return_taint = walk.walk_block(body, &mut taint_map, caller_node_id, depth, visited_modules, chain_prefix);
    FunctionOutcome {
        return_taint,
        findings: walk.findings,
        truncated: walk.truncated,
        truncation_reason: walk.truncation_reason,
    }
}

impl<'a> Walk<'a> {
    /// Walks a statement list, returning `Some` as soon as a `Return` is
    /// hit (its value's taint), mirroring the reaching-definitions walker's
    /// early-exit-on-terminator shape.
    fn walk_block(
        &mut self,
        stmts: &[Ir],
        taint_map: &mut TaintMap,
        caller_node_id: &str,
        depth: u32,
        visited_modules: &HashSet<String>,
        chain_prefix: &[SourceSpan],
    ) -> Option<TaintInfo> {
        for stmt in stmts {
            if let Some(returned) = self.walk_stmt(stmt, taint_map, caller_node_id, depth, visited_modules, chain_prefix) {
                return Some(returned);
            }
        }
        None
    }

    fn walk_stmt(
        &mut self,
        stmt: &Ir,
        taint_map: &mut TaintMap,
        caller_node_id: &str,
        depth: u32,
        visited_modules: &HashSet<String>,
        chain_prefix: &[SourceSpan],
    ) -> Option<TaintInfo> {
        match &stmt.kind {
            IrKind::Assign { target, value } => {
                let info = self.eval_expr(value, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                if let IrKind::Name { id } = &target.kind {
                    taint_map.insert(id.clone(), info);
                }
                None
            }
            IrKind::VariableDecl { name, value } => {
                let info = value
                    .as_ref()
                    .map(|v| self.eval_expr(v, taint_map, caller_node_id, depth, visited_modules, chain_prefix))
                    .unwrap_or_default();
                taint_map.insert(name.clone(), info);
                None
            }
            IrKind::ExprStmt { expr } => {
                self.eval_expr(expr, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                None
            }
            IrKind::Return { value } => Some(
                value
                    .as_ref()
                    .map(|v| self.eval_expr(v, taint_map, caller_node_id, depth, visited_modules, chain_prefix))
                    .unwrap_or_default(),
            ),
            IrKind::If { test, body, orelse } => {
                self.eval_expr(test, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                let mut then_map = taint_map.clone();
                let then_ret = self.walk_block(body, &mut then_map, caller_node_id, depth, visited_modules, chain_prefix);
                let mut else_map = taint_map.clone();
                let else_ret = self.walk_block(orelse, &mut else_map, caller_node_id, depth, visited_modules, chain_prefix);
                *taint_map = merge_maps(&then_map, &else_map);
                match (then_ret, else_ret) {
                    (Some(a), Some(b)) => Some(TaintInfo::merge_max(&a, &b)),
                    (Some(a), None) => Some(a),
                    (None, Some(b)) => Some(b),
                    (None, None) => None,
                }
            }
            IrKind::While { test, body } => {
                self.eval_expr(test, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                // Two passes approximate loop-carried taint, matching the
                // reaching-definitions pass's fixed-point shortcut.
                let mut pass_map = taint_map.clone();
                self.walk_block(body, &mut pass_map, caller_node_id, depth, visited_modules, chain_prefix);
                self.walk_block(body, &mut pass_map, caller_node_id, depth, visited_modules, chain_prefix);
                *taint_map = merge_maps(taint_map, &pass_map);
                None
            }
            IrKind::For { item, iter, body } => {
                let iter_info = self.eval_expr(iter, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                let mut pass_map = taint_map.clone();
                if let IrKind::Name { id } = &item.kind {
                    pass_map.insert(id.clone(), iter_info);
                }
                self.walk_block(body, &mut pass_map, caller_node_id, depth, visited_modules, chain_prefix);
                self.walk_block(body, &mut pass_map, caller_node_id, depth, visited_modules, chain_prefix);
                *taint_map = merge_maps(taint_map, &pass_map);
                None
            }
            IrKind::Try { body, handlers, finalizer } => {
                let mut body_map = taint_map.clone();
                self.walk_block(body, &mut body_map, caller_node_id, depth, visited_modules, chain_prefix);
                let mut merged = body_map;
                for handler in handlers {
                    let mut handler_map = taint_map.clone();
                    self.walk_block(&handler.body, &mut handler_map, caller_node_id, depth, visited_modules, chain_prefix);
                    merged = merge_maps(&merged, &handler_map);
                }
                *taint_map = merged;
                self.walk_block(finalizer, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                None
            }
            _ => {
                for child in stmt.children() {
                    self.eval_expr(child, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                }
                None
            }
        }
    }

    fn eval_expr(
        &mut self,
        expr: &Ir,
        taint_map: &TaintMap,
        caller_node_id: &str,
        depth: u32,
        visited_modules: &HashSet<String>,
        chain_prefix: &[SourceSpan],
    ) -> TaintInfo {
        match &expr.kind {
            IrKind::Name { id } => taint_map.get(id).cloned().unwrap_or_default(),
            IrKind::Literal { .. } => TaintInfo::untainted(),
            IrKind::BinaryOp { left, right, .. } => {
                let l = self.eval_expr(left, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                let r = self.eval_expr(right, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                TaintInfo::merge_max(&l, &r)
            }
            IrKind::UnaryOp { operand, .. } => {
                self.eval_expr(operand, taint_map, caller_node_id, depth, visited_modules, chain_prefix)
            }
            IrKind::Subscript { value, index } => {
                let v = self.eval_expr(value, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                let i = self.eval_expr(index, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                TaintInfo::merge_max(&v, &i)
            }
            IrKind::Attribute { value, .. } => {
                if let Some(path) = callee_path(expr) {
                    if let Some(level) = self.registry.classify_source(&path) {
                        return TaintInfo { level, sources: vec![expr.span.clone()], cleared_for_sinks: Default::default() };
                    }
                }
                self.eval_expr(value, taint_map, caller_node_id, depth, visited_modules, chain_prefix)
            }
            IrKind::Call { callee, args, intrinsic, format_fragments, .. } => {
                self.eval_call(expr, callee, args, intrinsic.as_deref(), format_fragments, taint_map, caller_node_id, depth, visited_modules, chain_prefix)
            }
            _ => {
                let mut combined = TaintInfo::untainted();
                for child in expr.children() {
                    let info = self.eval_expr(child, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                    combined = TaintInfo::merge_max(&combined, &info);
                }
                combined
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_call(
        &mut self,
        call_node: &Ir,
        callee: &Ir,
        args: &[Ir],
        intrinsic: Option<&str>,
        format_fragments: &[FormatFragment],
        taint_map: &TaintMap,
        caller_node_id: &str,
        depth: u32,
        visited_modules: &HashSet<String>,
        chain_prefix: &[SourceSpan],
    ) -> TaintInfo {
        let arg_taints: Vec<TaintInfo> =
            args.iter().map(|a| self.eval_expr(a, taint_map, caller_node_id, depth, visited_modules, chain_prefix)).collect();

        let mut combined = arg_taints.iter().fold(TaintInfo::untainted(), |acc, t| TaintInfo::merge_max(&acc, t));

        let mut fragment_taints: Vec<TaintInfo> = Vec::new();
        if intrinsic == Some("format") {
            for fragment in format_fragments {
                if let FormatFragment::Expr(e) = fragment {
                    let info = self.eval_expr(e, taint_map, caller_node_id, depth, visited_modules, chain_prefix);
                    combined = TaintInfo::merge_max(&combined, &info);
                    fragment_taints.push(info);
                }
            }
        }

        let callee_text = callee_path(callee);

        let result = if let Some(path) = &callee_text {
            if let Some(clears) = self.registry.classify_sanitizer(path) {
                if combined.is_tainted() {
                    let mut cleared = combined.cleared_for_sinks.clone();
                    cleared.extend(clears);
                    TaintInfo { level: combined.level, sources: combined.sources.clone(), cleared_for_sinks: cleared }
                } else {
                    TaintInfo::untainted()
                }
            } else if let Some(level) = self.registry.classify_source(path) {
                TaintInfo { level, sources: vec![call_node.span.clone()], cleared_for_sinks: Default::default() }
            } else {
                self.try_interprocedural(call_node, path, &arg_taints, caller_node_id, depth, visited_modules, chain_prefix)
                    .unwrap_or_else(|| combined.clone())
            }
        } else {
            combined.clone()
        };

        if let Some(path) = &callee_text {
            if let Some((category, threshold, cwe)) = self.registry.classify_sink(path) {
                for arg_taint in &arg_taints {
                    if arg_taint.level >= threshold && !arg_taint.cleared_for_sinks.contains(&category) {
                        self.emit_finding(arg_taint, call_node.span.clone(), category, cwe, chain_prefix, depth);
                    }
                }
            }
        }

        // spec.md §4.2/§8 scenario 1: a tainted value reaching the page
        // through string interpolation (f-string/template literal/
        // `String.format`) is the reflected-XSS sink itself — the sink
        // check has to look at `format_fragments`, not just `args`, since
        // every frontend lowers these with empty `args`.
        if intrinsic == Some("format") {
            if let Some((category, threshold, cwe)) = self.registry.classify_format_sink() {
                for fragment_taint in &fragment_taints {
                    if fragment_taint.level >= threshold && !fragment_taint.cleared_for_sinks.contains(&category) {
                        self.emit_finding(fragment_taint, call_node.span.clone(), category, cwe, chain_prefix, depth);
                    }
                }
            }
        }

        result
    }

    fn emit_finding(
        &mut self,
        source_info: &TaintInfo,
        sink_span: SourceSpan,
        category: SinkCategory,
        cwe: Option<&'static str>,
        chain_prefix: &[SourceSpan],
        depth: u32,
    ) {
        let Some(source_span) = source_info.sources.first().cloned() else { return };
        let mut chain = source_info.sources.clone();
        chain.extend(chain_prefix.iter().cloned());
        chain.push(sink_span.clone());
        let confidence = 0.9f64.powi(depth as i32);
        self.findings.push(Finding {
            source: source_span,
            sink: sink_span,
            sink_category: category,
            chain,
            confidence,
            severity: FindingSeverity::from(source_info.level),
            taint_level: source_info.level,
            cwe,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn try_interprocedural(
        &mut self,
        call_node: &Ir,
        _callee_text: &str,
        arg_taints: &[TaintInfo],
        caller_node_id: &str,
        depth: u32,
        visited_modules: &HashSet<String>,
        chain_prefix: &[SourceSpan],
    ) -> Option<TaintInfo> {
        let ctx = self.interprocedural?;
        if depth >= ctx.limits.max_depth {
            self.truncated = true;
            self.truncation_reason = Some(TruncationReason::Depth);
            tracing::debug!(depth, max_depth = ctx.limits.max_depth, "taint walk truncated at call-chain depth");
            return None;
        }
        let edges = ctx.call_graph.callees(&caller_node_id.to_string());
        let matching: Vec<_> = edges.into_iter().filter(|(_, data)| data.call_site == call_node.span).collect();
        if matching.is_empty() {
            return None;
        }

        let mut best: Option<TaintInfo> = None;
        for (callee_id, edge) in matching {
            let Some(function_ref) = ctx.function_index.get(callee_id) else { continue };
            let mut next_visited = visited_modules.clone();
            next_visited.insert(function_ref.file_path.clone());
            if next_visited.len() as u32 > ctx.limits.max_modules {
                self.truncated = true;
                self.truncation_reason = Some(TruncationReason::Modules);
                tracing::debug!(modules = next_visited.len(), max_modules = ctx.limits.max_modules, "taint walk truncated at module fan-out");
                continue;
            }

            let incoming = bind_params(function_ref.function, arg_taints);
            let mut next_chain = chain_prefix.to_vec();
            next_chain.push(call_node.span.clone());

            let outcome = analyze_function(
                function_ref.function,
                callee_id,
                incoming,
                self.registry,
                Some(ctx),
                depth + 1,
                &next_visited,
                &next_chain,
            );
            for mut finding in outcome.findings {
                finding.confidence *= edge.confidence;
                self.findings.push(finding);
            }
            if outcome.truncated {
                self.truncated = true;
                self.truncation_reason = outcome.truncation_reason;
            }
            if let Some(ret) = outcome.return_taint {
                best = Some(match best {
                    Some(existing) => TaintInfo::merge_max(&existing, &ret),
                    None => ret,
                });
            }
        }
        best
    }
}

fn bind_params(function: &Ir, arg_taints: &[TaintInfo]) -> TaintMap {
    let mut map = TaintMap::new();
    if let IrKind::FunctionDef { params, .. } = &function.kind {
        for (i, param) in params.iter().enumerate() {
            if let IrKind::Param { name, .. } = &param.kind {
                if let Some(info) = arg_taints.get(i) {
                    map.insert(name.clone(), info.clone());
                }
            }
        }
    }
    map
}

fn merge_maps(a: &TaintMap, b: &TaintMap) -> TaintMap {
    let mut out = a.clone();
    for (k, v) in b {
        out.entry(k.clone())
            .and_modify(|existing| *existing = TaintInfo::merge_max(existing, v))
            .or_insert_with(|| v.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};

    fn first_function(source: &str) -> Ir {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", source).unwrap();
        let IrKind::Module { body } = module.root.kind else { panic!("expected module") };
        body.into_iter().find(|n| matches!(n.kind, IrKind::FunctionDef { .. })).unwrap()
    }

    #[test]
    fn source_flows_to_sink_without_sanitization() {
        let f = first_function(
            "def handler(request, cursor):\n    q = request.args.get('id')\n    cursor.execute(q)\n",
        );
        let registry = TaintConfig::default_config();
        let outcome = analyze_function(&f, "handler", TaintMap::new(), &registry, None, 0, &HashSet::new(), &[]);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].sink_category, SinkCategory::Sql);
    }

    #[test]
    fn sanitizer_clears_the_matching_sink_category() {
        let f = first_function(
            "def handler(request, cursor):\n    q = request.args.get('id')\n    safe = int(q)\n    cursor.execute(safe)\n",
        );
        let registry = TaintConfig::default_config();
        let outcome = analyze_function(&f, "handler", TaintMap::new(), &registry, None, 0, &HashSet::new(), &[]);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn untainted_literal_argument_produces_no_finding() {
        let f = first_function("def handler(cursor):\n    cursor.execute('select 1')\n");
        let registry = TaintConfig::default_config();
        let outcome = analyze_function(&f, "handler", TaintMap::new(), &registry, None, 0, &HashSet::new(), &[]);
        assert!(outcome.findings.is_empty());
    }
}

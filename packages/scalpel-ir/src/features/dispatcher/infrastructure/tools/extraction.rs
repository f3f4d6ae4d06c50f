//! Extraction tools (spec.md §4.9): `extract_code`, `get_file_context`.

use serde_json::{json, Value};

use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::params::{optional_u64, require_str};
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::parsing::{default_registry, parse_file};
use crate::features::pdg::{build_pdg, DependenceEdge};
use crate::shared::ir::{Ir, IrKind};

fn symbol_name(ir: &Ir) -> Option<&str> {
    match &ir.kind {
        IrKind::FunctionDef { name, .. } => Some(name),
        IrKind::ClassDef { name, .. } => Some(name),
        IrKind::VariableDecl { name, .. } => Some(name),
        _ => None,
    }
}

fn find_named<'a>(root: &'a Ir, target: &str) -> Option<&'a Ir> {
    root.walk_preorder().into_iter().find(|n| symbol_name(n) == Some(target))
}

fn all_names(root: &Ir) -> Vec<String> {
    root.walk_preorder().into_iter().filter_map(symbol_name).map(str::to_string).collect()
}

fn not_found_with_hint(target: &str, known: &[String]) -> ErrorObject {
    ErrorObject::new(ErrorCode::NotFound, format!("no symbol named `{target}` in this file"))
        .with_details(json!({ "offending_name": target, "known_names": known }))
}

pub struct ExtractCodeTool;

impl ToolHandler for ExtractCodeTool {
    fn id(&self) -> &'static str {
        "extract_code"
    }

    fn known_names(&self, _ctx: &Context) -> Vec<String> {
        Vec::new()
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let target_name = require_str(&params, "target_name")?;

        let registry = default_registry();
        let module = parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let Some(node) = find_named(&module.root, &target_name) else {
            return Err(not_found_with_hint(&target_name, &all_names(&module.root)));
        };
        let span = &node.span;
        let start = span.byte_span.start;
        let end = span.byte_span.end.min(source.len());
        let text = source.get(start..end).unwrap_or_default();

        Ok(json!({
            "node_id": node.node_id,
            "kind": node.kind_name(),
            "span": span,
            "source_text": text,
        }))
    }
}

pub struct GetFileContextTool;

impl ToolHandler for GetFileContextTool {
    fn id(&self) -> &'static str {
        "get_file_context"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let target_name = require_str(&params, "target_name")?;
        let k_hops = optional_u64(&params, "k_hops").unwrap_or(2) as usize;

        let registry = default_registry();
        let module = parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let Some(function) = module.root.walk_preorder().into_iter().find(|n| {
            matches!(&n.kind, IrKind::FunctionDef { name, .. } if name == &target_name)
        }) else {
            return Err(not_found_with_hint(&target_name, &all_names(&module.root)));
        };

        let pdg = build_pdg(function)
            .map_err(|e| ErrorObject::new(ErrorCode::InternalError, format!("pdg construction failed: {e}")))?;

        let neighborhood = k_hop_neighborhood(&pdg.nodes, &pdg.edges, &function.node_id, k_hops);

        Ok(json!({
            "function_id": function.node_id,
            "function_body_hash": pdg.function_body_hash,
            "neighborhood": neighborhood,
            "k_hops": k_hops,
        }))
    }

    fn known_names(&self, _ctx: &Context) -> Vec<String> {
        Vec::new()
    }
}

/// Token-budget-bounded k-hop walk over the PDG's edges in both directions
/// (spec.md §4.9: "a k-hop neighborhood of its PDG, bounded by a token
/// budget"). A hard node cap stands in for a true token-count budget since
/// this layer has no tokenizer of its own to measure against.
const NEIGHBORHOOD_NODE_CAP: usize = 200;

fn k_hop_neighborhood(
    nodes: &[crate::shared::ids::NodeId],
    edges: &[DependenceEdge],
    root: &str,
    k_hops: usize,
) -> Vec<String> {
    use std::collections::HashSet;

    let node_set: HashSet<&str> = nodes.iter().map(String::as_str).collect();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: Vec<String> = vec![root.to_string()];
    visited.insert(root.to_string());

    for _ in 0..k_hops {
        if visited.len() >= NEIGHBORHOOD_NODE_CAP {
            break;
        }
        let mut next = Vec::new();
        for current in &frontier {
            for edge in edges {
                let (from, to) = match edge {
                    DependenceEdge::Control { from, to } => (from, to),
                    DependenceEdge::Data { from, to, .. } => (from, to),
                };
                if from == current && node_set.contains(to.as_str()) && visited.insert(to.clone()) {
                    next.push(to.clone());
                }
                if to == current && node_set.contains(from.as_str()) && visited.insert(from.clone()) {
                    next.push(from.clone());
                }
                if visited.len() >= NEIGHBORHOOD_NODE_CAP {
                    break;
                }
            }
        }
        frontier = next;
    }

    visited.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatcher::domain::NullAuditSink;
    use crate::features::policy::{evaluate, RequestedOptions, Tier};
    use std::sync::Arc;

    fn ctx() -> Context {
        Context {
            tier: Tier::Pro,
            limits: evaluate(Tier::Pro, &RequestedOptions::default()),
            cache: None,
            policy: None,
            audit_sink: Arc::new(NullAuditSink),
        }
    }

    #[test]
    fn extracts_a_function_body_by_name() {
        let tool = ExtractCodeTool;
        let params = json!({
            "file_path": "a.py",
            "source": "def process_data(x):\n    return x + 1\n",
            "target_name": "process_data",
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert_eq!(result["kind"], "FunctionDef");
        assert!(result["source_text"].as_str().unwrap().contains("process_data"));
    }

    #[test]
    fn a_near_miss_target_name_surfaces_the_offending_name_for_oracle_hints() {
        let tool = ExtractCodeTool;
        let params = json!({
            "file_path": "a.py",
            "source": "def process_data(x):\n    return x + 1\n",
            "target_name": "proces_data",
        });
        let err = tool.call(&ctx(), params).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.error_details["offending_name"], "proces_data");
    }

    #[test]
    fn get_file_context_returns_a_pdg_neighborhood() {
        let tool = GetFileContextTool;
        let params = json!({
            "file_path": "a.py",
            "source": "def f(x):\n    y = x + 1\n    return y\n",
            "target_name": "f",
            "k_hops": 3,
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert!(!result["neighborhood"].as_array().unwrap().is_empty());
    }
}

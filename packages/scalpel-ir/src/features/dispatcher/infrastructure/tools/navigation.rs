//! Navigation tools (spec.md §4.9): `crawl_project`, `get_project_map`,
//! `get_symbol_references`, `get_call_graph`, `get_graph_neighborhood`,
//! `get_cross_file_dependencies`.

use std::collections::{HashSet, VecDeque};

use serde_json::{json, Value};

use crate::features::cross_file::build_project_index;
use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::params::{optional_u64, require_files, require_str};
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::parsing::{default_registry, parse_file};
use crate::features::refactor::infrastructure::find_references;
use crate::shared::ports::Language;

fn parse_project(files: &[(String, String)]) -> Vec<crate::features::parsing::ParsedModule> {
    let registry = default_registry();
    files
        .iter()
        .filter_map(|(path, source)| {
            if Language::from_file_path(path).is_none() {
                return None;
            }
            parse_file(&registry, path, source).ok()
        })
        .collect()
}

/// `crawl_project` (spec.md §4.9, B1/B2): walk the supplied files, parse
/// each, and report per-file diagnostics without failing the whole request
/// when one file has a syntax error.
pub struct CrawlProjectTool;

impl ToolHandler for CrawlProjectTool {
    fn id(&self) -> &'static str {
        "crawl_project"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let registry = default_registry();
        let mut per_file = Vec::new();
        for (path, source) in &files {
            let entry = match Language::from_file_path(path) {
                None => json!({ "file_path": path, "language": null, "diagnostics": [] }),
                Some(_) => match parse_file(&registry, path, source) {
                    Ok(module) => json!({
                        "file_path": path,
                        "language": module.language.name(),
                        "diagnostics": module.diagnostics,
                    }),
                    Err(e) => json!({
                        "file_path": path,
                        "language": null,
                        "diagnostics": [{ "message": e.to_string() }],
                    }),
                },
            };
            per_file.push(entry);
        }
        Ok(json!({ "files": per_file, "file_count": files.len() }))
    }
}

/// `get_project_map` (spec.md §4.9): symbol table + import-graph summary.
pub struct GetProjectMapTool;

impl ToolHandler for GetProjectMapTool {
    fn id(&self) -> &'static str {
        "get_project_map"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let modules = parse_project(&files);
        let index = build_project_index(&modules);

        let files_summary: Vec<Value> = index
            .tables
            .iter()
            .map(|(path, table)| {
                json!({
                    "file_path": path,
                    "symbols": table.all().iter().map(|s| json!({
                        "name": s.name,
                        "fqn": s.fqn,
                        "kind": format!("{:?}", s.kind),
                        "is_exported": s.is_exported,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({
            "files": files_summary,
            "unresolved_reference_count": index.unresolved_references.len(),
            "call_graph_node_count": index.call_graph.node_count(),
            "call_graph_edge_count": index.call_graph.edge_count(),
        }))
    }
}

/// `get_symbol_references` (spec.md §4.9): every AST- and string-literal
/// reference to a name, project-wide — the same context-aware scanner
/// `simulate_refactor` uses for rename safety.
pub struct GetSymbolReferencesTool;

impl ToolHandler for GetSymbolReferencesTool {
    fn id(&self) -> &'static str {
        "get_symbol_references"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let symbol_name = require_str(&params, "symbol_name")?;
        let references = find_references(&files, &symbol_name);
        Ok(json!({ "symbol_name": symbol_name, "references": references, "count": references.len() }))
    }
}

/// `get_call_graph` (spec.md §4.9, §4.3): the full resolved call graph.
pub struct GetCallGraphTool;

impl ToolHandler for GetCallGraphTool {
    fn id(&self) -> &'static str {
        "get_call_graph"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let modules = parse_project(&files);
        let index = build_project_index(&modules);
        let edges: Vec<Value> = index
            .call_graph
            .all_edges()
            .into_iter()
            .map(|(caller, callee, data)| {
                json!({
                    "caller": caller,
                    "callee": callee,
                    "resolution_kind": format!("{:?}", data.resolution_kind),
                    "confidence": data.confidence,
                    "via_aliased_import": data.via_aliased_import,
                })
            })
            .collect();
        Ok(json!({ "edges": edges, "node_count": index.call_graph.node_count() }))
    }
}

/// `get_graph_neighborhood` (spec.md §4.9): a k-hop walk over the call
/// graph from a given node, following edges in both directions.
pub struct GetGraphNeighborhoodTool;

impl ToolHandler for GetGraphNeighborhoodTool {
    fn id(&self) -> &'static str {
        "get_graph_neighborhood"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let node_id = require_str(&params, "node_id")?;
        let k_hops = optional_u64(&params, "k_hops").unwrap_or(2) as usize;

        let modules = parse_project(&files);
        let index = build_project_index(&modules);
        if !index.call_graph.contains_node(&node_id) {
            return Err(ErrorObject::new(ErrorCode::NotFound, format!("no graph node `{node_id}`"))
                .with_details(json!({ "offending_name": node_id })));
        }

        let mut visited: HashSet<String> = HashSet::from([node_id.clone()]);
        let mut queue: VecDeque<(String, usize)> = VecDeque::from([(node_id.clone(), 0)]);
        while let Some((current, depth)) = queue.pop_front() {
            if depth >= k_hops {
                continue;
            }
            for (callee, _) in index.call_graph.callees(&current) {
                if visited.insert(callee.clone()) {
                    queue.push_back((callee.clone(), depth + 1));
                }
            }
            for (caller, _) in index.call_graph.callers(&current) {
                if visited.insert(caller.clone()) {
                    queue.push_back((caller.clone(), depth + 1));
                }
            }
        }

        Ok(json!({ "node_id": node_id, "neighborhood": visited, "k_hops": k_hops }))
    }
}

/// `get_cross_file_dependencies` (spec.md §4.9, §4.3): the resolved import
/// graph between project files.
pub struct GetCrossFileDependenciesTool;

impl ToolHandler for GetCrossFileDependenciesTool {
    fn id(&self) -> &'static str {
        "get_cross_file_dependencies"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let modules = parse_project(&files);
        let index = build_project_index(&modules);

        let dependencies: Vec<Value> = index
            .imports
            .iter()
            .map(|(file, bindings)| {
                json!({
                    "file_path": file,
                    "imports": bindings.values().map(|resolved| json!({
                        "module": resolved.statement.module,
                        "resolved_file": resolved.target_file,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({ "dependencies": dependencies }))
    }
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
    fn crawl_project_reports_a_diagnostic_for_a_syntax_error_without_failing() {
        let tool = CrawlProjectTool;
        let params = json!({ "files": [
            { "path": "good.py", "source": "def f():\n    return 1\n" },
            { "path": "bad.py", "source": "def f(:\n" },
        ]});
        let result = tool.call(&ctx(), params).unwrap();
        assert_eq!(result["file_count"], 2);
    }

    #[test]
    fn empty_project_navigation_succeeds_with_empty_results() {
        let tool = GetProjectMapTool;
        let result = tool.call(&ctx(), json!({ "files": [] })).unwrap();
        assert_eq!(result["files"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn get_call_graph_resolves_a_direct_call_between_two_files() {
        let tool = GetCallGraphTool;
        let params = json!({ "files": [
            { "path": "handler.py", "source": "from storage import save\n\ndef handler():\n    save(1)\n" },
            { "path": "storage.py", "source": "def save(x):\n    return x\n" },
        ]});
        let result = tool.call(&ctx(), params).unwrap();
        assert!(!result["edges"].as_array().unwrap().is_empty());
    }
}

//! Call-graph construction (spec.md §4.3): walks every module's IR looking
//! for `Call` nodes and classifies each one against the five resolution
//! rules, then records an edge in the shared [`CallGraph`].
//!
//! Because the IR carries no type annotations (spec.md §3 deliberately
//! drops per-language type fidelity), "method call on a typed receiver" is
//! never reachable here — every `Attribute` call falls into the untyped
//! virtual-dispatch rule. A later type-inference pass could upgrade these
//! edges without changing this module's shape.

use std::collections::HashMap;

use crate::features::cross_file::domain::project_index::ResolvedImport;
use crate::features::parsing::domain::ParsedModule;
use crate::shared::callgraph::{CallEdgeData, CallGraph, ResolutionKind};
use crate::shared::ir::{Ir, IrKind};
use crate::shared::symbol::{SymbolKind, SymbolRecord, SymbolTable};

/// Names bound to builtins that escape static analysis outright — a call
/// through any of these is `dynamic` regardless of how it was reached
/// (spec.md §4.3: "Call through a value ... reflection, `eval`").
const DYNAMIC_BUILTINS: &[&str] = &["eval", "exec", "getattr", "compile", "Function"];

const EXTERNAL_NODE: &str = "<external>";

struct Resolver<'a> {
    tables: &'a HashMap<String, SymbolTable>,
    imports: &'a HashMap<String, HashMap<String, ResolvedImport>>,
}

impl<'a> Resolver<'a> {
    /// Resolves a bare name against the narrowest enclosing scope visible
    /// from `scope_chain`, falling back to the file's import bindings.
    fn resolve_name(&self, file: &str, name: &str, scope_chain: &[String]) -> Option<&'a SymbolRecord> {
        let table = self.tables.get(file)?;
        let mut best: Option<&SymbolRecord> = None;
        for candidate in table.by_name(name) {
            if is_prefix(&candidate.scope_chain, scope_chain)
                && best.map_or(true, |b| candidate.scope_chain.len() > b.scope_chain.len())
            {
                best = Some(candidate);
            }
        }
        if let Some(found) = best {
            return Some(found);
        }
        self.resolve_via_import(file, name)
    }

    fn resolve_via_import(&self, file: &str, name: &str) -> Option<&'a SymbolRecord> {
        let binding = self.imports.get(file)?.get(name)?;
        let target_file = binding.target_file.as_ref()?;
        let target_table = self.tables.get(target_file)?;
        if binding.statement.is_wildcard {
            return target_table.all().iter().find(|s| s.is_exported && s.name == name);
        }
        let lookup_name = binding.statement.imported_name.as_deref().unwrap_or(name);
        target_table
            .by_name(lookup_name)
            .into_iter()
            .find(|s| s.is_exported && s.scope_chain.is_empty())
    }

    /// Names bound through an import to something we can't see into —
    /// used to recognize `evil = eval` style aliasing of dynamic builtins.
    fn is_external_import(&self, file: &str, name: &str) -> bool {
        self.imports
            .get(file)
            .and_then(|m| m.get(name))
            .is_some_and(|b| b.target_file.is_none())
    }

    /// All project-wide candidates for an untyped method/attribute call,
    /// matched purely by name (spec.md §4.3 rule 3).
    fn candidates_by_method_name(&self, name: &str) -> Vec<&'a SymbolRecord> {
        self.tables
            .values()
            .flat_map(|t| t.all())
            .filter(|s| s.name == name && matches!(s.kind, SymbolKind::Function | SymbolKind::Method))
            .collect()
    }
}

fn is_prefix(prefix: &[String], full: &[String]) -> bool {
    prefix.len() <= full.len() && prefix.iter().zip(full.iter()).all(|(a, b)| a == b)
}

pub fn build_call_graph(
    tables: &HashMap<String, SymbolTable>,
    imports: &HashMap<String, HashMap<String, ResolvedImport>>,
    modules: &[ParsedModule],
) -> CallGraph {
    let resolver = Resolver { tables, imports };
    let mut graph = CallGraph::new();
    for module in modules {
        let mut local_aliases: HashMap<String, String> = HashMap::new();
        walk(&resolver, module, &module.root, &mut Vec::new(), "<module>", &mut local_aliases, &mut graph);
    }
    graph
}

fn walk(
    resolver: &Resolver<'_>,
    module: &ParsedModule,
    node: &Ir,
    scope_chain: &mut Vec<String>,
    caller_fqn: &str,
    aliases: &mut HashMap<String, String>,
    graph: &mut CallGraph,
) {
    match &node.kind {
        IrKind::FunctionDef { name, params, body, .. } => {
            scope_chain.push(name.clone());
            let fqn = scope_chain.join(".");
            let caller_id = resolver
                .tables
                .get(&module.file_path)
                .and_then(|t| t.by_fqn(&fqn))
                .map(|s| s.node_id.clone())
                .unwrap_or_else(|| node.node_id.clone());
            for param in params {
                walk(resolver, module, param, scope_chain, &caller_id, aliases, graph);
            }
            for stmt in body {
                walk(resolver, module, stmt, scope_chain, &caller_id, aliases, graph);
            }
            scope_chain.pop();
        }
        IrKind::ClassDef { name, bases, body } => {
            for base in bases {
                walk(resolver, module, base, scope_chain, caller_fqn, aliases, graph);
            }
            scope_chain.push(name.clone());
            for stmt in body {
                walk(resolver, module, stmt, scope_chain, caller_fqn, aliases, graph);
            }
            scope_chain.pop();
        }
        IrKind::Assign { target, value } => {
            record_alias(target, value, aliases);
            walk(resolver, module, target, scope_chain, caller_fqn, aliases, graph);
            walk(resolver, module, value, scope_chain, caller_fqn, aliases, graph);
        }
        IrKind::VariableDecl { name, value } => {
            if let Some(value) = value {
                if let IrKind::Name { id } = &value.kind {
                    aliases.insert(name.clone(), id.clone());
                }
                walk(resolver, module, value, scope_chain, caller_fqn, aliases, graph);
            }
        }
        IrKind::Call { callee, args, .. } => {
            classify_call(resolver, module, node, callee, scope_chain, caller_fqn, aliases, graph);
            for arg in args {
                walk(resolver, module, arg, scope_chain, caller_fqn, aliases, graph);
            }
        }
        _ => {
            for child in node.children() {
                walk(resolver, module, child, scope_chain, caller_fqn, aliases, graph);
            }
        }
    }
}

fn record_alias(target: &Ir, value: &Ir, aliases: &mut HashMap<String, String>) {
    if let (IrKind::Name { id: lhs }, IrKind::Name { id: rhs }) = (&target.kind, &value.kind) {
        aliases.insert(lhs.clone(), rhs.clone());
    }
}

fn classify_call(
    resolver: &Resolver<'_>,
    module: &ParsedModule,
    call_node: &Ir,
    callee: &Ir,
    scope_chain: &[String],
    caller_id: &str,
    aliases: &HashMap<String, String>,
    graph: &mut CallGraph,
) {
    let file = &module.file_path;
    match &callee.kind {
        IrKind::Name { id } => {
            // Chase one level of local aliasing: `evil = eval; evil()`.
            let resolved_name = aliases.get(id).map(|s| s.as_str()).unwrap_or(id.as_str());
            if DYNAMIC_BUILTINS.contains(&resolved_name) || resolver.is_external_import(file, resolved_name) {
                graph.add_call(
                    &caller_id.to_string(),
                    &EXTERNAL_NODE.to_string(),
                    CallEdgeData::new(call_node.span.clone(), ResolutionKind::Dynamic, id != resolved_name),
                );
                return;
            }
            match resolver.resolve_name(file, resolved_name, scope_chain) {
                Some(callee_symbol) if matches!(callee_symbol.kind, SymbolKind::Function | SymbolKind::Method | SymbolKind::Class) => {
                    graph.add_call(
                        &caller_id.to_string(),
                        &callee_symbol.node_id,
                        CallEdgeData::new(call_node.span.clone(), ResolutionKind::Direct, id != resolved_name),
                    );
                }
                _ => {}
            }
        }
        IrKind::Attribute { attr, .. } => {
            if DYNAMIC_BUILTINS.contains(&attr.as_str()) {
                graph.add_call(
                    &caller_id.to_string(),
                    &EXTERNAL_NODE.to_string(),
                    CallEdgeData::new(call_node.span.clone(), ResolutionKind::Dynamic, false),
                );
                return;
            }
            let candidates = resolver.candidates_by_method_name(attr);
            if candidates.is_empty() {
                return; // not a project symbol at all: no edge (unmodeled external method)
            }
            let confidence = (1.0 / candidates.len() as f64).min(ResolutionKind::VirtualUntyped.confidence_cap());
            for candidate in candidates {
                let mut data = CallEdgeData::new(call_node.span.clone(), ResolutionKind::VirtualUntyped, false);
                data.confidence = confidence;
                graph.add_call(&caller_id.to_string(), &candidate.node_id, data);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cross_file::application::build_project_index;
    use crate::features::parsing::{default_registry, parse_file};

    #[test]
    fn direct_call_within_a_single_file_resolves_at_full_confidence() {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", "def helper():\n    pass\n\ndef main():\n    helper()\n").unwrap();
        let index = build_project_index(&[module]);
        let helper_id = index.tables["a.py"].by_fqn("helper").unwrap().node_id.clone();
        let main_id = index.tables["a.py"].by_fqn("main").unwrap().node_id.clone();
        let callees = index.call_graph.callees(&main_id);
        assert_eq!(callees.len(), 1);
        assert_eq!(callees[0].0, &helper_id);
        assert_eq!(callees[0].1.confidence, 1.0);
    }

    #[test]
    fn eval_call_is_dynamic_with_low_confidence() {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", "def main():\n    eval('1')\n").unwrap();
        let index = build_project_index(&[module]);
        let main_id = index.tables["a.py"].by_fqn("main").unwrap().node_id.clone();
        let callees = index.call_graph.callees(&main_id);
        assert_eq!(callees.len(), 1);
        assert_eq!(callees[0].0, EXTERNAL_NODE);
        assert!(callees[0].1.confidence <= 0.3);
    }

    #[test]
    fn aliased_dynamic_builtin_is_still_dynamic() {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", "def main():\n    evil = eval\n    evil('1')\n").unwrap();
        let index = build_project_index(&[module]);
        let main_id = index.tables["a.py"].by_fqn("main").unwrap().node_id.clone();
        let callees = index.call_graph.callees(&main_id);
        assert_eq!(callees.len(), 1);
        assert_eq!(callees[0].0, EXTERNAL_NODE);
        assert!(callees[0].1.via_aliased_import);
    }

    #[test]
    fn untyped_method_call_fans_out_across_all_candidates() {
        let registry = default_registry();
        let a = parse_file(&registry, "a.py", "class A:\n    def run(self):\n        pass\n").unwrap();
        let b = parse_file(&registry, "b.py", "class B:\n    def run(self):\n        pass\n").unwrap();
        let c = parse_file(&registry, "c.py", "def main(x):\n    x.run()\n").unwrap();
        let index = build_project_index(&[a, b, c]);
        let main_id = index.tables["c.py"].by_fqn("main").unwrap().node_id.clone();
        let callees = index.call_graph.callees(&main_id);
        assert_eq!(callees.len(), 2);
        for (_, edge) in &callees {
            assert_eq!(edge.resolution_kind, ResolutionKind::VirtualUntyped);
            assert!(edge.confidence <= 0.5);
        }
    }
}

//! Builds a [`ProjectIndex`] from a set of already-lowered modules
//! (spec.md §4.3: per-file definitions tables composed into a project index
//! via the import graph).

use std::collections::{HashMap, HashSet};

use crate::features::cross_file::domain::project_index::{ProjectIndex, ResolvedImport, UnresolvedReference};
use crate::features::cross_file::infrastructure::{call_graph_builder, import_resolver, symbol_collector};
use crate::features::parsing::domain::ParsedModule;
use crate::shared::ir::{Ir, IrKind};
use crate::shared::symbol::SymbolTable;

pub fn build_project_index(modules: &[ParsedModule]) -> ProjectIndex {
    let mut tables: HashMap<String, SymbolTable> = HashMap::new();
    for module in modules {
        let table = symbol_collector::collect_symbols(module.language, &module.file_path, &module.root);
        tables.insert(module.file_path.clone(), table);
    }

    let known_files: HashSet<String> = tables.keys().cloned().collect();
    let mut imports: HashMap<String, HashMap<String, ResolvedImport>> = HashMap::new();
    for module in modules {
        let mut bindings = HashMap::new();
        for statement in &module.imports {
            let target_file =
                import_resolver::resolve_module(&module.file_path, &statement.module, module.language, &known_files);
            bindings.insert(
                statement.local_name().to_string(),
                ResolvedImport { statement: statement.clone(), target_file },
            );
        }
        imports.insert(module.file_path.clone(), bindings);
    }

    let call_graph = call_graph_builder::build_call_graph(&tables, &imports, modules);
    let unresolved_references = find_unresolved_references(modules, &tables, &imports);

    ProjectIndex { tables, imports, call_graph, unresolved_references }
}

/// Every `Name` use that resolves neither lexically nor through an import —
/// surfaced so the dispatcher's oracle-hint pass (spec.md §4.9) has
/// candidates to suggest against.
fn find_unresolved_references(
    modules: &[ParsedModule],
    tables: &HashMap<String, SymbolTable>,
    imports: &HashMap<String, HashMap<String, ResolvedImport>>,
) -> Vec<UnresolvedReference> {
    let mut out = Vec::new();
    for module in modules {
        let Some(table) = tables.get(&module.file_path) else { continue };
        let bindings = imports.get(&module.file_path);
        collect_unresolved(&module.root, &mut Vec::new(), &module.file_path, table, bindings, &mut out);
    }
    out
}

fn collect_unresolved(
    node: &Ir,
    scope_chain: &mut Vec<String>,
    file_path: &str,
    table: &SymbolTable,
    bindings: Option<&HashMap<String, ResolvedImport>>,
    out: &mut Vec<UnresolvedReference>,
) {
    match &node.kind {
        IrKind::FunctionDef { name, params, body, .. } => {
            scope_chain.push(name.clone());
            for param in params {
                collect_unresolved(param, scope_chain, file_path, table, bindings, out);
            }
            for stmt in body {
                collect_unresolved(stmt, scope_chain, file_path, table, bindings, out);
            }
            scope_chain.pop();
        }
        IrKind::ClassDef { name, bases, body } => {
            for base in bases {
                collect_unresolved(base, scope_chain, file_path, table, bindings, out);
            }
            scope_chain.push(name.clone());
            for stmt in body {
                collect_unresolved(stmt, scope_chain, file_path, table, bindings, out);
            }
            scope_chain.pop();
        }
        IrKind::Name { id } => {
            let in_scope = table.by_name(id).iter().any(|s| is_visible(&s.scope_chain, scope_chain));
            let imported = bindings.is_some_and(|b| b.contains_key(id));
            if !in_scope && !imported {
                out.push(UnresolvedReference {
                    file_path: file_path.to_string(),
                    name: id.clone(),
                    use_span: node.span.clone(),
                });
            }
        }
        _ => {
            for child in node.children() {
                collect_unresolved(child, scope_chain, file_path, table, bindings, out);
            }
        }
    }
}

fn is_visible(def_scope: &[String], use_scope: &[String]) -> bool {
    def_scope.len() <= use_scope.len() && def_scope.iter().zip(use_scope.iter()).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};

    #[test]
    fn unresolved_name_is_recorded() {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", "def f():\n    return undefined_name\n").unwrap();
        let index = build_project_index(&[module]);
        assert!(index.unresolved_references.iter().any(|r| r.name == "undefined_name"));
    }

    #[test]
    fn cross_file_import_resolves_without_being_flagged_unresolved() {
        let registry = default_registry();
        let a = parse_file(&registry, "a.py", "def helper():\n    pass\n").unwrap();
        let b = parse_file(&registry, "b.py", "from a import helper\n\ndef main():\n    helper()\n").unwrap();
        let index = build_project_index(&[a, b]);
        assert!(index.imports["b.py"].contains_key("helper"));
        assert!(index.imports["b.py"]["helper"].target_file.as_deref() == Some("a.py"));
        assert!(!index.unresolved_references.iter().any(|r| r.name == "helper" && r.file_path == "b.py"));
    }
}

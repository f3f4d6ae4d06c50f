//! Walks a lowered module's IR and records every declaration into a
//! per-module [`SymbolTable`] (spec.md §4.3: "Per module, build: definitions
//! table, scope tree").
//!
//! Traversal follows [`Ir::children`] generically for every node kind it
//! does not special-case, so a `FunctionDef` nested inside an `If` body or
//! passed as a `Call` argument (a desugared lambda, spec.md §4.2) is still
//! discovered — the scope tree falls naturally out of the IR's own nesting.

use crate::shared::ir::{Ir, IrKind};
use crate::shared::ports::Language;
use crate::shared::symbol::{SymbolKind, SymbolRecord, SymbolTable};

pub fn collect_symbols(language: Language, file_path: &str, root: &Ir) -> SymbolTable {
    let mut table = SymbolTable::new(file_path);
    let mut scope_chain: Vec<String> = Vec::new();
    let mut kind_stack: Vec<SymbolKind> = Vec::new();
    walk(language, root, &mut scope_chain, &mut kind_stack, &mut table);
    table
}

fn fqn_for(scope_chain: &[String], name: &str) -> String {
    if scope_chain.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope_chain.join("."), name)
    }
}

/// Module-level names are the module's public surface unless they look
/// private by convention; nested names are never directly importable.
fn is_exported(scope_chain: &[String], name: &str) -> bool {
    scope_chain.is_empty() && !name.starts_with('_')
}

fn walk(
    language: Language,
    node: &Ir,
    scope_chain: &mut Vec<String>,
    kind_stack: &mut Vec<SymbolKind>,
    table: &mut SymbolTable,
) {
    match &node.kind {
        IrKind::FunctionDef { name, params, body, .. } => {
            let kind = if matches!(kind_stack.last(), Some(SymbolKind::Class)) {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            table.insert(SymbolRecord {
                node_id: node.node_id.clone(),
                kind,
                name: name.clone(),
                fqn: fqn_for(scope_chain, name),
                span: node.span.clone(),
                language,
                scope_chain: scope_chain.clone(),
                is_exported: is_exported(scope_chain, name),
            });
            scope_chain.push(name.clone());
            kind_stack.push(SymbolKind::Function);
            for param in params {
                walk(language, param, scope_chain, kind_stack, table);
            }
            for stmt in body {
                walk(language, stmt, scope_chain, kind_stack, table);
            }
            kind_stack.pop();
            scope_chain.pop();
        }
        IrKind::ClassDef { name, bases, body } => {
            table.insert(SymbolRecord {
                node_id: node.node_id.clone(),
                kind: SymbolKind::Class,
                name: name.clone(),
                fqn: fqn_for(scope_chain, name),
                span: node.span.clone(),
                language,
                scope_chain: scope_chain.clone(),
                is_exported: is_exported(scope_chain, name),
            });
            for base in bases {
                walk(language, base, scope_chain, kind_stack, table);
            }
            scope_chain.push(name.clone());
            kind_stack.push(SymbolKind::Class);
            for stmt in body {
                walk(language, stmt, scope_chain, kind_stack, table);
            }
            kind_stack.pop();
            scope_chain.pop();
        }
        IrKind::VariableDecl { name, value } => {
            table.insert(SymbolRecord {
                node_id: node.node_id.clone(),
                kind: SymbolKind::Variable,
                name: name.clone(),
                fqn: fqn_for(scope_chain, name),
                span: node.span.clone(),
                language,
                scope_chain: scope_chain.clone(),
                is_exported: is_exported(scope_chain, name),
            });
            if let Some(value) = value {
                walk(language, value, scope_chain, kind_stack, table);
            }
        }
        IrKind::Param { name, default } => {
            table.insert(SymbolRecord {
                node_id: node.node_id.clone(),
                kind: SymbolKind::Parameter,
                name: name.clone(),
                fqn: fqn_for(scope_chain, name),
                span: node.span.clone(),
                language,
                scope_chain: scope_chain.clone(),
                is_exported: false,
            });
            if let Some(default) = default {
                walk(language, default, scope_chain, kind_stack, table);
            }
        }
        _ => {
            for child in node.children() {
                walk(language, child, scope_chain, kind_stack, table);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};

    #[test]
    fn collects_module_function_and_nested_method() {
        let registry = default_registry();
        let module = parse_file(
            &registry,
            "a.py",
            "class Greeter:\n    def hello(self):\n        return 1\n\ndef top():\n    pass\n",
        )
        .unwrap();
        let table = collect_symbols(module.language, &module.file_path, &module.root);
        assert!(table.by_fqn("Greeter").is_some());
        assert!(table.by_fqn("Greeter.hello").is_some());
        assert!(table.by_fqn("top").is_some());
        assert_eq!(table.by_fqn("Greeter.hello").unwrap().kind, SymbolKind::Method);
    }

    #[test]
    fn private_names_are_not_exported() {
        let registry = default_registry();
        let module = parse_file(&registry, "a.py", "def _helper():\n    pass\n").unwrap();
        let table = collect_symbols(module.language, &module.file_path, &module.root);
        assert!(!table.by_fqn("_helper").unwrap().is_exported);
    }
}

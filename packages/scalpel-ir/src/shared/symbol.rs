//! Symbols, scopes, and per-module symbol tables (spec.md §3 "Symbol", §4.3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::shared::ids::NodeId;
use crate::shared::ports::Language;
use crate::shared::span::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Variable,
    Parameter,
    Module,
}

/// A declared name, its defining span, and the scope chain it lives in
/// (spec.md §3: "Symbol: kind, name, defining span, enclosing scope chain").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub node_id: NodeId,
    pub kind: SymbolKind,
    pub name: String,
    /// Fully qualified name, dot-joined from the module root.
    pub fqn: String,
    pub span: SourceSpan,
    pub language: Language,
    /// Enclosing scope chain, outermost first, not including `name` itself.
    pub scope_chain: Vec<String>,
    pub is_exported: bool,
}

impl SymbolRecord {
    pub fn scope_depth(&self) -> usize {
        self.scope_chain.len()
    }
}

/// Per-module symbol table: every declared symbol plus a name -> definitions
/// index used by reference resolution (spec.md §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    pub file_path: String,
    symbols: Vec<SymbolRecord>,
    by_name: HashMap<String, Vec<usize>>,
    by_fqn: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            symbols: Vec::new(),
            by_name: HashMap::new(),
            by_fqn: HashMap::new(),
        }
    }

    pub fn insert(&mut self, symbol: SymbolRecord) {
        let idx = self.symbols.len();
        self.by_name.entry(symbol.name.clone()).or_default().push(idx);
        self.by_fqn.insert(symbol.fqn.clone(), idx);
        self.symbols.push(symbol);
    }

    pub fn all(&self) -> &[SymbolRecord] {
        &self.symbols
    }

    pub fn by_name(&self, name: &str) -> Vec<&SymbolRecord> {
        self.by_name
            .get(name)
            .map(|idxs| idxs.iter().map(|&i| &self.symbols[i]).collect())
            .unwrap_or_default()
    }

    pub fn by_fqn(&self, fqn: &str) -> Option<&SymbolRecord> {
        self.by_fqn.get(fqn).map(|&i| &self.symbols[i])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A reference to a symbol from a use site, prior to resolution (spec.md
/// §4.3). `resolved` is filled in once cross-module resolution runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReference {
    pub name: String,
    pub use_span: SourceSpan,
    pub resolved: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, fqn: &str) -> SymbolRecord {
        SymbolRecord {
            node_id: format!("python:a.py:1:0:{name}"),
            kind: SymbolKind::Function,
            name: name.to_string(),
            fqn: fqn.to_string(),
            span: SourceSpan::zero("a.py"),
            language: Language::Python,
            scope_chain: vec![],
            is_exported: true,
        }
    }

    #[test]
    fn lookup_by_name_and_fqn() {
        let mut table = SymbolTable::new("a.py");
        table.insert(sym("process", "module.process"));
        assert_eq!(table.by_name("process").len(), 1);
        assert!(table.by_fqn("module.process").is_some());
        assert!(table.by_fqn("missing").is_none());
    }

    #[test]
    fn by_name_supports_overloads_in_different_scopes() {
        let mut table = SymbolTable::new("a.py");
        table.insert(sym("run", "A.run"));
        table.insert(sym("run", "B.run"));
        assert_eq!(table.by_name("run").len(), 2);
    }
}

//! Project-level symbol & reference index (spec.md §4.3: C3): one
//! [`SymbolTable`] per module plus the resolved import graph and the call
//! graph built across all of them.

use std::collections::HashMap;

use crate::features::parsing::domain::ImportStatement;
use crate::shared::callgraph::CallGraph;
use crate::shared::span::SourceSpan;
use crate::shared::symbol::SymbolTable;

/// Where a local name bound by an import points, once resolved against the
/// files known to this project.
#[derive(Debug, Clone)]
pub struct ResolvedImport {
    pub statement: ImportStatement,
    /// `None` when the module lives outside the project (a third-party
    /// package, a stdlib module) — the binding is still tracked so alias
    /// chains through it are recognized, but calls through it resolve to
    /// `<external>` rather than a project symbol.
    pub target_file: Option<String>,
}

/// A name use that neither the enclosing scope chain nor the import graph
/// could resolve. Feeds the dispatcher's oracle-hint suggestion pass
/// (spec.md §4.9).
#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    pub file_path: String,
    pub name: String,
    pub use_span: SourceSpan,
}

#[derive(Debug, Default)]
pub struct ProjectIndex {
    pub tables: HashMap<String, SymbolTable>,
    /// file_path -> local binding name -> resolved import.
    pub imports: HashMap<String, HashMap<String, ResolvedImport>>,
    pub call_graph: CallGraph,
    pub unresolved_references: Vec<UnresolvedReference>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, file_path: &str) -> Option<&SymbolTable> {
        self.tables.get(file_path)
    }

    /// Every exported symbol across every module, for project-wide name
    /// lookups (untyped virtual dispatch, oracle-hint candidates).
    pub fn all_exported(&self) -> impl Iterator<Item = (&str, &crate::shared::symbol::SymbolRecord)> {
        self.tables.iter().flat_map(|(file, table)| {
            table.all().iter().filter(|s| s.is_exported).map(move |s| (file.as_str(), s))
        })
    }
}

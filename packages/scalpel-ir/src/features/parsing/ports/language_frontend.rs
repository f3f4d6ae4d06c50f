//! Language Frontend port (spec.md §4.2: C2 Language Frontends).
//!
//! Each supported language implements this trait to turn source text into
//! the shared [`crate::shared::ir::Ir`] tree. Nothing past this boundary
//! knows which grammar produced a node — the frontend is where tree-sitter
//! lives and dies.

use std::collections::HashMap;

use crate::errors::Result;
use crate::features::parsing::domain::ImportStatement;
use crate::shared::ir::{Diagnostic, Ir};
use crate::shared::ports::Language;

/// Outcome of lowering one file's source into IR.
#[derive(Debug, Clone)]
pub struct FrontendOutput {
    pub root: Ir,
    pub diagnostics: Vec<Diagnostic>,
    pub imports: Vec<ImportStatement>,
}

pub trait LanguageFrontend: Send + Sync {
    fn language(&self) -> Language;

    /// Parse `source` (from `relative_path`) into a `Module` IR root.
    ///
    /// `relative_path` feeds the Universal Node ID scheme (spec.md §3) and
    /// must be stable across re-parses of unchanged bytes.
    fn lower(&self, source: &str, relative_path: &str) -> Result<FrontendOutput>;
}

/// Dispatch table from [`Language`] to its frontend implementation.
#[derive(Default)]
pub struct FrontendRegistry {
    frontends: HashMap<Language, Box<dyn LanguageFrontend>>,
}

impl FrontendRegistry {
    pub fn new() -> Self {
        Self { frontends: HashMap::new() }
    }

    pub fn register(&mut self, frontend: Box<dyn LanguageFrontend>) {
        self.frontends.insert(frontend.language(), frontend);
    }

    pub fn get(&self, language: Language) -> Option<&dyn LanguageFrontend> {
        self.frontends.get(&language).map(|f| f.as_ref())
    }

    pub fn for_file(&self, path: &str) -> Option<&dyn LanguageFrontend> {
        Language::from_file_path(path).and_then(|lang| self.get(lang))
    }
}

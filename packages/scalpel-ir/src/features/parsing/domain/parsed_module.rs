//! The result of lowering one source file (spec.md §4.2).

use crate::features::parsing::domain::ImportStatement;
use crate::shared::ir::{Diagnostic, Ir};
use crate::shared::ports::Language;

#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub language: Language,
    pub file_path: String,
    pub root: Ir,
    pub diagnostics: Vec<Diagnostic>,
    pub imports: Vec<ImportStatement>,
}

impl ParsedModule {
    pub fn new(
        language: Language,
        file_path: impl Into<String>,
        root: Ir,
        diagnostics: Vec<Diagnostic>,
        imports: Vec<ImportStatement>,
    ) -> Self {
        Self { language, file_path: file_path.into(), root, diagnostics, imports }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| matches!(d.severity, crate::shared::ir::Severity::Error))
    }
}

//! Structural-diff output between two versions of a file (spec.md §4.10:
//! "compute structural diff (renamed symbols, signature changes,
//! deleted/added functions)").

use serde::{Deserialize, Serialize};

use crate::shared::span::SourceSpan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
    SignatureChanged,
    BodyChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub symbol_name: String,
    pub span: Option<SourceSpan>,
}

/// One place a renamed/changed identifier was found to be referenced
/// (spec.md §4.10: "including string-literal references inside known sink
/// categories ... by scanning literals with context-aware regexes").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub file_path: String,
    pub span: SourceSpan,
    pub in_string_literal: bool,
    pub resolved: bool,
}

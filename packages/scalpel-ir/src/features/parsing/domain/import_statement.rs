//! Import statements recorded during lowering (feeds C3 symbol/reference
//! indexing's cross-module resolution, spec.md §4.3).
//!
//! Frontends own grammar knowledge, so each frontend recognizes its own
//! import syntax directly during lowering rather than leaving the indexer to
//! reconstruct it from `Opaque` children. One `ImportStatement` is emitted
//! per local binding a statement introduces, so `import os, sys as s`
//! produces two records and `from a import (b, c as d)` produces two.

use crate::shared::span::SourceSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub span: SourceSpan,
    /// The module path as written: dotted for Python/Java, a bare specifier
    /// for JS/TS (`"./utils"`, `"react"`).
    pub module: String,
    /// `None` means the whole module is bound as a single name (`import os`,
    /// a JS default/namespace import); `Some(name)` means only that member
    /// of the module is imported (`from os import path`, `import {x}`).
    pub imported_name: Option<String>,
    /// The local binding this import introduces, when it differs from
    /// `imported_name` or the module's own name (`as` / `as` clauses).
    pub alias: Option<String>,
    /// `from x import *` / Java's `import x.*`.
    pub is_wildcard: bool,
}

impl ImportStatement {
    /// The name this import binds in the importing module's scope.
    pub fn local_name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        if let Some(name) = &self.imported_name {
            return name;
        }
        self.module.rsplit(['.', '/']).next().unwrap_or(&self.module)
    }
}

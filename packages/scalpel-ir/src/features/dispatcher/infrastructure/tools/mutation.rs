//! Mutation tools (spec.md §4.9): `rename_symbol`, `update_symbol`,
//! `simulate_refactor`. Every tool here rewrites source text and so carries
//! the backup discipline spec.md §4.9/§6 requires.

use serde_json::{json, Value};

use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::backup::write_backup;
use crate::features::dispatcher::infrastructure::params::{optional_files, optional_str, require_str};
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::refactor::{simulate_refactor, RefactorInput};

/// `rename_symbol` (spec.md §4.9, §4.10 literal scenario 4): renames every
/// AST occurrence of `old` to `new` in the target file, backs up the
/// original, and reports the refactor-safety verdict for the edit it made.
pub struct RenameSymbolTool;

impl ToolHandler for RenameSymbolTool {
    fn id(&self) -> &'static str {
        "rename_symbol"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let old_name = require_str(&params, "old_name")?;
        let new_name = require_str(&params, "new_name")?;
        let timestamp = optional_str(&params, "timestamp").unwrap_or_else(|| "unknown".to_string());
        let project_files = optional_files(&params, "project_files");

        let renamed = rename_all_occurrences(&source, &old_name, &new_name);

        let backup_path = if params.get("write_to_disk").and_then(Value::as_bool).unwrap_or(false) {
            let path = std::path::Path::new(&file_path);
            let backup = write_backup(path, &source, &timestamp)
                .map_err(|e| ErrorObject::new(ErrorCode::InternalError, e.to_string()))?;
            std::fs::write(path, &renamed).map_err(|e| {
                ErrorObject::new(ErrorCode::InternalError, format!("failed to write renamed source: {e}"))
            })?;
            Some(backup.to_string_lossy().to_string())
        } else {
            None
        };

        let input = RefactorInput {
            file_path: file_path.clone(),
            original_source: source,
            proposed_source: renamed.clone(),
            rename: Some((old_name, new_name)),
            project_files,
        };
        let result = simulate_refactor(&input)
            .map_err(|e| ErrorObject::new(ErrorCode::InternalError, format!("refactor simulation failed: {e}")))?;

        let mut data = serde_json::to_value(&result).unwrap_or(Value::Null);
        data["proposed_source"] = json!(renamed);
        if let Some(path) = backup_path {
            data["backup_path"] = json!(path);
        }
        Ok(data)
    }
}

/// Identifier-boundary rename over raw text — the same approach
/// `reference_scan`'s string-literal catalogue takes, not a full AST
/// rewrite, since the kernel's frontends are read-only lowering passes with
/// no unparse/pretty-printer to round-trip through.
fn rename_all_occurrences(source: &str, old_name: &str, new_name: &str) -> String {
    let pattern = regex::Regex::new(&format!(r"\b{}\b", regex::escape(old_name))).expect("valid regex");
    let escaped_replacement = new_name.replace('$', "$$");
    pattern.replace_all(source, escaped_replacement.as_str()).into_owned()
}

/// `update_symbol` (spec.md §4.9): replaces a named function/class/variable
/// body wholesale with caller-supplied replacement text, with the same
/// backup discipline.
pub struct UpdateSymbolTool;

impl ToolHandler for UpdateSymbolTool {
    fn id(&self) -> &'static str {
        "update_symbol"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let target_name = require_str(&params, "target_name")?;
        let replacement = require_str(&params, "replacement_source")?;
        let timestamp = optional_str(&params, "timestamp").unwrap_or_else(|| "unknown".to_string());

        let registry = crate::features::parsing::default_registry();
        let module = crate::features::parsing::parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let found = module.root.walk_preorder().into_iter().find(|n| {
            matches!(&n.kind,
                crate::shared::ir::IrKind::FunctionDef { name, .. }
                | crate::shared::ir::IrKind::ClassDef { name, .. }
                | crate::shared::ir::IrKind::VariableDecl { name, .. }
                if name == &target_name)
        });
        let Some(node) = found else {
            return Err(ErrorObject::new(ErrorCode::NotFound, format!("no symbol named `{target_name}` in {file_path}"))
                .with_details(json!({ "offending_name": target_name })));
        };

        let start = node.span.byte_span.start;
        let end = node.span.byte_span.end.min(source.len());
        let mut updated = String::with_capacity(source.len());
        updated.push_str(&source[..start]);
        updated.push_str(&replacement);
        updated.push_str(&source[end..]);

        let reparsed = crate::features::parsing::parse_file(&registry, &file_path, &updated);
        let mut backup_path = None;
        if params.get("write_to_disk").and_then(Value::as_bool).unwrap_or(false) {
            let path = std::path::Path::new(&file_path);
            let backup = write_backup(path, &source, &timestamp)
                .map_err(|e| ErrorObject::new(ErrorCode::InternalError, e.to_string()))?;
            if reparsed.is_err() {
                // Validation failed: restore before returning (spec.md §4.9
                // "backup discipline for mutating tools").
                crate::features::dispatcher::infrastructure::backup::restore_backup(path, &backup)
                    .map_err(|e| ErrorObject::new(ErrorCode::InternalError, e.to_string()))?;
                return Err(ErrorObject::new(
                    ErrorCode::InvalidInput,
                    "replacement source does not parse; original file restored from backup",
                )
                .with_details(json!({ "backup_path": backup.to_string_lossy() })));
            }
            std::fs::write(path, &updated)
                .map_err(|e| ErrorObject::new(ErrorCode::InternalError, format!("failed to write updated source: {e}")))?;
            backup_path = Some(backup.to_string_lossy().to_string());
        } else if reparsed.is_err() {
            return Err(ErrorObject::new(
                ErrorCode::InvalidInput,
                "replacement source does not parse; no write was attempted",
            ));
        }

        let mut data = json!({ "updated_source": updated, "target_name": target_name });
        if let Some(path) = backup_path {
            data["backup_path"] = json!(path);
        }
        Ok(data)
    }
}

/// `simulate_refactor` (spec.md §4.9, §4.10): the read-only analysis
/// underlying `rename_symbol`, callable directly for a proposed edit that
/// has not been written anywhere yet.
pub struct SimulateRefactorTool;

impl ToolHandler for SimulateRefactorTool {
    fn id(&self) -> &'static str {
        "simulate_refactor"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let original_source = require_str(&params, "original_source")?;
        let proposed_source = require_str(&params, "proposed_source")?;
        let rename = match (optional_str(&params, "old_name"), optional_str(&params, "new_name")) {
            (Some(old), Some(new)) => Some((old, new)),
            _ => None,
        };
        let project_files = optional_files(&params, "project_files");

        let input = RefactorInput { file_path, original_source, proposed_source, rename, project_files };
        let result = simulate_refactor(&input)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("refactor simulation failed: {e}")))?;
        Ok(serde_json::to_value(&result).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatcher::domain::NullAuditSink;
    use crate::features::policy::{evaluate, RequestedOptions, Tier};
    use std::sync::Arc;

    fn ctx() -> Context {
        Context {
            tier: Tier::Pro,
            limits: evaluate(Tier::Pro, &RequestedOptions::default()),
            cache: None,
            policy: None,
            audit_sink: Arc::new(NullAuditSink),
        }
    }

    #[test]
    fn renaming_a_parameter_into_a_sql_literal_reports_unsafe() {
        let tool = RenameSymbolTool;
        let params = json!({
            "file_path": "m.py",
            "source": "def handler(user_id):\n    return user_id\n",
            "old_name": "user_id",
            "new_name": "account_id",
            "project_files": [{ "path": "report.sql", "source": "SELECT user_id FROM users\n" }],
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert_eq!(result["is_safe"], false);
        assert!(result["proposed_source"].as_str().unwrap().contains("account_id"));
    }

    #[test]
    fn update_symbol_rejects_a_replacement_that_fails_to_parse() {
        let tool = UpdateSymbolTool;
        let params = json!({
            "file_path": "m.py",
            "source": "def f(x):\n    return x\n",
            "target_name": "f",
            "replacement_source": "def f(:\n",
        });
        let err = tool.call(&ctx(), params).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn simulate_refactor_tool_matches_the_underlying_use_case() {
        let tool = SimulateRefactorTool;
        let params = json!({
            "file_path": "a.py",
            "original_source": "def f(x):\n    return x\n",
            "proposed_source": "def f(x):\n    return x\n",
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert_eq!(result["is_safe"], true);
    }
}

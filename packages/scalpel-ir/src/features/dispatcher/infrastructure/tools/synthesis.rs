//! Synthesis tools (spec.md §4.9): `generate_unit_tests`, `symbolic_execute`.

use serde_json::{json, Value};

use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::params::require_str;
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::parsing::{default_registry, parse_file};
use crate::features::smt::default_solver;
use crate::features::symbolic_execution::{symbolic_execute, ExecutionKnobs};
use crate::shared::ir::IrKind;

fn find_function<'a>(root: &'a crate::shared::ir::Ir, name: &str) -> Option<&'a crate::shared::ir::Ir> {
    root.walk_preorder()
        .into_iter()
        .find(|n| matches!(&n.kind, IrKind::FunctionDef { name: fn_name, .. } if fn_name == name))
}

pub struct SymbolicExecuteTool;

impl ToolHandler for SymbolicExecuteTool {
    fn id(&self) -> &'static str {
        "symbolic_execute"
    }

    fn call(&self, ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let target_name = require_str(&params, "target_name")?;

        let registry = default_registry();
        let module = parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let Some(function) = find_function(&module.root, &target_name) else {
            return Err(ErrorObject::new(ErrorCode::NotFound, format!("no function named `{target_name}` in {file_path}"))
                .with_details(json!({ "offending_name": target_name })));
        };

        let mut solver = default_solver();
        let knobs = ExecutionKnobs { solver_timeout_ms: ctx_solver_timeout(ctx), ..ExecutionKnobs::default() };
        let result = symbolic_execute(function, None, solver.as_mut(), knobs);
        Ok(serde_json::to_value(&result).unwrap_or(Value::Null))
    }
}

fn ctx_solver_timeout(_ctx: &Context) -> u64 {
    // spec.md §6: `CS_SOLVER_TIMEOUT_MS`, default 5000 — read once at
    // process start, not per request, so it lives outside `Context`.
    std::env::var("CS_SOLVER_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(5_000)
}

/// `generate_unit_tests` (spec.md §4.9): runs the symbolic executor and
/// reshapes its synthesized test cases into a plain unit-test description
/// (spec.md §4.6: "concrete inputs are emitted as test cases in a generic
/// form"; this tool is the dispatcher-facing view of that output).
pub struct GenerateUnitTestsTool;

impl ToolHandler for GenerateUnitTestsTool {
    fn id(&self) -> &'static str {
        "generate_unit_tests"
    }

    fn call(&self, ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;
        let target_name = require_str(&params, "target_name")?;

        let registry = default_registry();
        let module = parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let Some(function) = find_function(&module.root, &target_name) else {
            return Err(ErrorObject::new(ErrorCode::NotFound, format!("no function named `{target_name}` in {file_path}"))
                .with_details(json!({ "offending_name": target_name })));
        };

        let mut solver = default_solver();
        let knobs = ExecutionKnobs { solver_timeout_ms: ctx_solver_timeout(ctx), ..ExecutionKnobs::default() };
        let result = symbolic_execute(function, None, solver.as_mut(), knobs);

        let tests: Vec<Value> = result
            .test_cases
            .iter()
            .enumerate()
            .map(|(i, tc)| {
                json!({
                    "test_name": format!("{target_name}_case_{i}"),
                    "inputs": tc.inputs,
                    "expected_output": tc.expected_output,
                    "expects_exception": tc.raises,
                    "uncertain": tc.uncertain,
                })
            })
            .collect();

        Ok(json!({ "target_name": target_name, "tests": tests, "path_count": result.paths.len() }))
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
    fn symbolic_execute_tool_finds_the_narrow_witness() {
        let tool = SymbolicExecuteTool;
        let params = json!({
            "file_path": "f.py",
            "source": "def f(code):\n    if code > 500 and code < 505 and code == 503:\n        raise ValueError('x')\n",
            "target_name": "f",
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert!(result["paths"].as_array().unwrap().len() >= 2);
    }

    #[test]
    fn generate_unit_tests_produces_at_least_one_test_case() {
        let tool = GenerateUnitTestsTool;
        let params = json!({
            "file_path": "f.py",
            "source": "def f(x):\n    if x > 0:\n        return 1\n    return 0\n",
            "target_name": "f",
        });
        let result = tool.call(&ctx(), params).unwrap();
        assert!(!result["tests"].as_array().unwrap().is_empty());
    }
}

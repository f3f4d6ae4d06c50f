//! Public entry point for `symbolic_execute` (spec.md §4.6, §4.9 tool
//! family "Synthesis"): runs the worklist executor over one function and
//! synthesizes a generic test case per feasible/bounded path.

use crate::features::smt::domain::{ConcreteValue, Formula};
use crate::features::smt::ports::ConstraintSolver;
use crate::shared::ir::Ir;

use crate::features::symbolic_execution::domain::path::{Path, PathStatus, Terminal};
use crate::features::symbolic_execution::domain::test_case::TestCase;
use crate::features::symbolic_execution::infrastructure::{execute_function, ExecutionKnobs};

#[derive(Debug, Default, serde::Serialize)]
pub struct SymbolicExecutionResult {
    pub paths: Vec<Path>,
    pub test_cases: Vec<TestCase>,
}

pub fn symbolic_execute(
    function: &Ir,
    precondition: Option<Formula>,
    solver: &mut dyn ConstraintSolver,
    knobs: ExecutionKnobs,
) -> SymbolicExecutionResult {
    let paths = execute_function(function, precondition, solver, knobs);
    let test_cases = paths.iter().filter_map(synthesize_test_case).collect();
    SymbolicExecutionResult { paths, test_cases }
}

fn synthesize_test_case(path: &Path) -> Option<TestCase> {
    if !matches!(path.status, PathStatus::Feasible | PathStatus::Bounded) {
        return None;
    }
    let witness = path.witness.clone()?;
    let expected_output = match &path.terminal {
        Terminal::Returned(Some(value)) => concrete_of(value, &witness),
        Terminal::Raised(Some(value)) => concrete_of(value, &witness),
        _ => None,
    };
    let raises = matches!(path.terminal, Terminal::Raised(_));
    Some(TestCase { inputs: witness, expected_output, uncertain: path.is_uncertain(), raises })
}

fn concrete_of(
    value: &crate::features::symbolic_execution::domain::symbolic_value::SymbolicValue,
    witness: &crate::features::smt::ports::Model,
) -> Option<ConcreteValue> {
    use crate::features::symbolic_execution::domain::symbolic_value::SymbolicValue;
    match value {
        SymbolicValue::Concrete(c) => Some(c.clone()),
        SymbolicValue::Symbolic(name, _) => witness.get(name).cloned(),
        SymbolicValue::Expr(..) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};
    use crate::features::smt::infrastructure::IntervalSolver;
    use crate::shared::ir::IrKind;

    fn first_function(ir: &Ir) -> &Ir {
        ir.walk_preorder().into_iter().find(|n| matches!(n.kind, IrKind::FunctionDef { .. })).unwrap()
    }

    #[test]
    fn narrow_boolean_chain_yields_a_witness_reaching_the_raise() {
        let registry = default_registry();
        let module = parse_file(
            &registry,
            "f.py",
            "def f(code):\n    if code > 500 and code < 505 and code == 503:\n        raise ValueError('x')\n",
        )
        .unwrap();
        let function = first_function(&module.root);
        let mut solver = IntervalSolver::new();
        let result = symbolic_execute(function, None, &mut solver, ExecutionKnobs::default());
        assert!(result.paths.len() >= 2, "expected at least a raise path and a fallthrough path");
        let raising = result.paths.iter().find(|p| matches!(p.terminal, Terminal::Raised(_)));
        assert!(raising.is_some(), "one path must reach the raise");
    }

    #[test]
    fn loop_with_zero_fuel_still_analyzes_post_loop_statements() {
        let registry = default_registry();
        let module = parse_file(
            &registry,
            "f.py",
            "def f(n):\n    while n > 0:\n        n = n - 1\n    return n\n",
        )
        .unwrap();
        let function = first_function(&module.root);
        let mut solver = IntervalSolver::new();
        let knobs = ExecutionKnobs { default_loop_fuel: 0, ..ExecutionKnobs::default() };
        let result = symbolic_execute(function, None, &mut solver, knobs);
        assert!(!result.paths.is_empty());
        assert!(result.paths.iter().any(|p| p.status == PathStatus::Bounded));
    }
}

//! Behavioral-equivalence check between two versions of a function
//! (spec.md §4.10): "run the symbolic executor on both versions and
//! compare the set of feasible path conditions and return formulas".

use std::collections::HashSet;

use crate::features::refactor::domain::Equivalence;
use crate::features::smt::infrastructure::IntervalSolver;
use crate::features::symbolic_execution::domain::path::{Path, PathStatus, Terminal};
use crate::features::symbolic_execution::infrastructure::{execute_function, ExecutionKnobs};
use crate::shared::ir::Ir;

/// A path reduced to the textual signature the comparison is keyed on —
/// the path condition formulas plus what the path terminates with. Two
/// functions are equivalent iff this signature set matches exactly.
fn signature(path: &Path) -> String {
    let terminal = match &path.terminal {
        Terminal::Returned(v) => format!("return:{v:?}"),
        Terminal::Raised(v) => format!("raise:{v:?}"),
        Terminal::Truncated => "truncated".to_string(),
    };
    format!("{:?}|{terminal}", path.path_condition)
}

pub fn check_equivalence(original: &Ir, proposed: &Ir) -> Equivalence {
    let mut original_solver = IntervalSolver::new();
    let mut proposed_solver = IntervalSolver::new();
    let knobs = ExecutionKnobs::default();

    let original_paths = execute_function(original, None, &mut original_solver, knobs);
    let proposed_paths = execute_function(proposed, None, &mut proposed_solver, knobs);

    if original_paths.is_empty() || proposed_paths.is_empty() {
        return Equivalence::Unknown;
    }
    if original_paths.iter().any(|p| p.status == PathStatus::Bounded)
        || proposed_paths.iter().any(|p| p.status == PathStatus::Bounded)
    {
        // A bounded path means exploration didn't see the whole behavior —
        // spec.md §4.10 maps this to the solver-timeout case: "unknown".
        return Equivalence::Unknown;
    }

    let original_set: HashSet<String> = original_paths
        .iter()
        .filter(|p| p.status == PathStatus::Feasible)
        .map(signature)
        .collect();
    let proposed_set: HashSet<String> = proposed_paths
        .iter()
        .filter(|p| p.status == PathStatus::Feasible)
        .map(signature)
        .collect();

    if original_set == proposed_set {
        Equivalence::Equivalent
    } else {
        Equivalence::NotEquivalent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::{default_registry, parse_file};
    use crate::shared::ir::IrKind;

    fn first_function(ir: &Ir) -> &Ir {
        ir.walk_preorder().into_iter().find(|n| matches!(n.kind, IrKind::FunctionDef { .. })).unwrap()
    }

    #[test]
    fn identical_functions_are_equivalent() {
        let registry = default_registry();
        let a = parse_file(&registry, "a.py", "def f(x):\n    if x > 0:\n        return 1\n    return 0\n").unwrap();
        let b = parse_file(&registry, "b.py", "def f(x):\n    if x > 0:\n        return 1\n    return 0\n").unwrap();
        let equivalence = check_equivalence(first_function(&a.root), first_function(&b.root));
        assert_eq!(equivalence, Equivalence::Equivalent);
    }

    #[test]
    fn a_changed_return_value_is_not_equivalent() {
        let registry = default_registry();
        let a = parse_file(&registry, "a.py", "def f(x):\n    if x > 0:\n        return 1\n    return 0\n").unwrap();
        let b = parse_file(&registry, "b.py", "def f(x):\n    if x > 0:\n        return 2\n    return 0\n").unwrap();
        let equivalence = check_equivalence(first_function(&a.root), first_function(&b.root));
        assert_eq!(equivalence, Equivalence::NotEquivalent);
    }
}

//! Default [`ConstraintSolver`] backend: no external SMT library, just
//! per-variable interval propagation over the conjuncts of the formula set
//! plus a bounded point search to resolve a witness. Ships as the
//! zero-dependency default so `symbolic_execute` works without the
//! `z3-solver` feature; swap in [`super::z3_solver::Z3Solver`] for full
//! theory reasoning (strings, bit-vectors, arrays).
//!
//! Deliberately incomplete: constraints this solver cannot interpret are
//! ignored rather than rejected, which only costs precision (it may call
//! something `Sat` that a real SMT solver would refute) — callers that
//! need soundness should build with `z3-solver`.

use std::collections::HashMap;

use crate::features::smt::domain::{ConcreteValue, Formula};
use crate::features::smt::ports::{CheckResult, ConstraintSolver, Model};
use crate::shared::ir::Operator;

const BOUND: i64 = 1_000_000;

#[derive(Debug, Clone, Copy)]
struct IntRange {
    lo: i64,
    hi: i64,
}

impl IntRange {
    fn full() -> Self {
        IntRange { lo: -BOUND, hi: BOUND }
    }

    fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    fn intersect_point(&mut self, point: i64) {
        self.lo = self.lo.max(point);
        self.hi = self.hi.min(point);
    }
}

#[derive(Default)]
pub struct IntervalSolver {
    formulas: Vec<Formula>,
    timeout_ms: u64,
    last_model: Option<Model>,
}

impl IntervalSolver {
    pub fn new() -> Self {
        Self { formulas: Vec::new(), timeout_ms: 5_000, last_model: None }
    }
}

impl ConstraintSolver for IntervalSolver {
    fn add(&mut self, formula: &Formula) {
        self.formulas.push(formula.clone());
    }

    fn check(&mut self) -> CheckResult {
        let mut ranges: HashMap<String, IntRange> = HashMap::new();
        let mut bool_bindings: HashMap<String, bool> = HashMap::new();
        let mut excluded: HashMap<String, Vec<i64>> = HashMap::new();
        let mut unsat = false;

        for formula in &self.formulas {
            if !apply(formula, &mut ranges, &mut bool_bindings, &mut excluded) {
                unsat = true;
            }
        }

        if unsat || ranges.values().any(|r| r.is_empty()) {
            self.last_model = None;
            return CheckResult::Unsat;
        }

        let mut model = Model::new();
        for (name, range) in &ranges {
            let excludes = excluded.get(name).cloned().unwrap_or_default();
            match pick_in_range(*range, &excludes) {
                Some(value) => {
                    model.insert(name.clone(), ConcreteValue::Int(value));
                }
                None => {
                    self.last_model = None;
                    return CheckResult::Unsat;
                }
            }
        }
        for (name, value) in &bool_bindings {
            model.insert(name.clone(), ConcreteValue::Bool(*value));
        }

        self.last_model = Some(model);
        CheckResult::Sat
    }

    fn model(&self) -> Option<Model> {
        self.last_model.clone()
    }

    fn reset(&mut self) {
        self.formulas.clear();
        self.last_model = None;
    }

    fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }
}

fn pick_in_range(range: IntRange, excluded: &[i64]) -> Option<i64> {
    if range.is_empty() {
        return None;
    }
    let mut candidate = range.lo;
    while excluded.contains(&candidate) {
        candidate += 1;
        if candidate > range.hi {
            return None;
        }
    }
    Some(candidate)
}

/// Tightens `ranges`/`bool_bindings` from one top-level conjunct. Returns
/// `false` if this conjunct is a known contradiction (e.g. `False`,
/// comparing a constant against itself falsely).
fn apply(
    formula: &Formula,
    ranges: &mut HashMap<String, IntRange>,
    bool_bindings: &mut HashMap<String, bool>,
    excluded: &mut HashMap<String, Vec<i64>>,
) -> bool {
    match formula {
        Formula::True => true,
        Formula::False => false,
        Formula::Const(ConcreteValue::Bool(b)) => *b,
        Formula::BinaryOp(Operator::And, lhs, rhs) => {
            apply(lhs, ranges, bool_bindings, excluded) && apply(rhs, ranges, bool_bindings, excluded)
        }
        Formula::BinaryOp(op, lhs, rhs) => {
            if let (Some(name), Some(constant)) = (var_name(lhs), int_const(rhs)) {
                apply_int_cmp(ranges, excluded, &name, *op, constant)
            } else if let (Some(constant), Some(name)) = (int_const(lhs), var_name(rhs)) {
                apply_int_cmp(ranges, excluded, &name, flip(*op), constant)
            } else {
                true
            }
        }
        Formula::UnaryOp(Operator::Not, inner) => {
            if let Formula::BinaryOp(op, lhs, rhs) = inner.as_ref() {
                if let (Some(name), Some(constant)) = (var_name(lhs), int_const(rhs)) {
                    return apply_int_cmp(ranges, excluded, &name, negate(*op), constant);
                }
            }
            true
        }
        Formula::Var(name, crate::features::smt::domain::Sort::Bool) => {
            bool_bindings.insert(name.clone(), true);
            true
        }
        _ => true,
    }
}

fn apply_int_cmp(
    ranges: &mut HashMap<String, IntRange>,
    excluded: &mut HashMap<String, Vec<i64>>,
    name: &str,
    op: Operator,
    constant: i64,
) -> bool {
    let range = ranges.entry(name.to_string()).or_insert_with(IntRange::full);
    match op {
        Operator::Eq => range.intersect_point(constant),
        Operator::Ne => excluded.entry(name.to_string()).or_default().push(constant),
        Operator::Lt => range.hi = range.hi.min(constant - 1),
        Operator::Le => range.hi = range.hi.min(constant),
        Operator::Gt => range.lo = range.lo.max(constant + 1),
        Operator::Ge => range.lo = range.lo.max(constant),
        _ => {}
    }
    !range.is_empty()
}

fn flip(op: Operator) -> Operator {
    match op {
        Operator::Lt => Operator::Gt,
        Operator::Le => Operator::Ge,
        Operator::Gt => Operator::Lt,
        Operator::Ge => Operator::Le,
        other => other,
    }
}

fn negate(op: Operator) -> Operator {
    match op {
        Operator::Eq => Operator::Ne,
        Operator::Ne => Operator::Eq,
        Operator::Lt => Operator::Ge,
        Operator::Le => Operator::Gt,
        Operator::Gt => Operator::Le,
        Operator::Ge => Operator::Lt,
        other => other,
    }
}

fn var_name(formula: &Formula) -> Option<String> {
    match formula {
        Formula::Var(name, _) | Formula::Havoc(name, _) => Some(name.clone()),
        _ => None,
    }
}

fn int_const(formula: &Formula) -> Option<i64> {
    match formula {
        Formula::Const(ConcreteValue::Int(value)) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::smt::domain::Sort;

    #[test]
    fn narrows_a_range_to_the_single_feasible_point() {
        let mut solver = IntervalSolver::new();
        let code = Formula::var("code", Sort::Int);
        solver.add(&Formula::BinaryOp(Operator::Gt, Box::new(code.clone()), Box::new(Formula::int(500))));
        solver.add(&Formula::BinaryOp(Operator::Lt, Box::new(code.clone()), Box::new(Formula::int(505))));
        solver.add(&Formula::BinaryOp(Operator::Eq, Box::new(code), Box::new(Formula::int(503))));
        assert_eq!(solver.check(), CheckResult::Sat);
        assert_eq!(solver.model().unwrap().get("code"), Some(&ConcreteValue::Int(503)));
    }

    #[test]
    fn contradictory_bounds_are_unsat() {
        let mut solver = IntervalSolver::new();
        let x = Formula::var("x", Sort::Int);
        solver.add(&Formula::BinaryOp(Operator::Gt, Box::new(x.clone()), Box::new(Formula::int(10))));
        solver.add(&Formula::BinaryOp(Operator::Lt, Box::new(x), Box::new(Formula::int(5))));
        assert_eq!(solver.check(), CheckResult::Unsat);
    }

    #[test]
    fn reset_clears_prior_constraints() {
        let mut solver = IntervalSolver::new();
        let x = Formula::var("x", Sort::Int);
        solver.add(&Formula::BinaryOp(Operator::Eq, Box::new(x), Box::new(Formula::int(1))));
        assert_eq!(solver.check(), CheckResult::Sat);
        solver.reset();
        assert_eq!(solver.check(), CheckResult::Sat);
    }
}

//! The solver seam the symbolic executor is built against (spec.md §4.6:
//! "abstracted behind a `ConstraintSolver` interface with operations
//! `{add, check, model, reset, set_timeout_ms}`"). Swapping backends
//! (the default interval solver vs. the `z3-solver`-feature-gated SMT
//! backend) never touches `features::symbolic_execution`.

use std::collections::HashMap;

use crate::features::smt::domain::{ConcreteValue, Formula};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Sat,
    Unsat,
    /// The per-query timeout elapsed before a verdict (spec.md §4.6:
    /// "default per-query timeout 5,000 ms; on timeout the branch is
    /// recorded as `status=Bounded`").
    Unknown,
}

pub type Model = HashMap<String, ConcreteValue>;

pub trait ConstraintSolver {
    /// Adds a conjunct to the solver's running constraint set.
    fn add(&mut self, formula: &Formula);

    /// Checks satisfiability of everything added since the last `reset`.
    fn check(&mut self) -> CheckResult;

    /// A satisfying assignment, valid only immediately after a `check`
    /// that returned [`CheckResult::Sat`].
    fn model(&self) -> Option<Model>;

    /// Clears the running constraint set, ready for the next path.
    fn reset(&mut self);

    fn set_timeout_ms(&mut self, timeout_ms: u64);
}

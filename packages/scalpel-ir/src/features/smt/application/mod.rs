//! Solver selection (spec.md §4.6: the `ConstraintSolver` trait is
//! "pluggable"; a lightweight default ships, a `z3` feature flag enables an
//! SMT-backed solver" per SPEC_FULL.md's C6 summary).

use crate::features::smt::infrastructure::IntervalSolver;
use crate::features::smt::ports::ConstraintSolver;

/// Builds the solver backend compiled into this binary. Behind the
/// `z3-solver` feature this returns a [`crate::features::smt::infrastructure::Z3Solver`];
/// otherwise the zero-dependency [`IntervalSolver`].
pub fn default_solver() -> Box<dyn ConstraintSolver> {
    #[cfg(feature = "z3-solver")]
    {
        Box::new(crate::features::smt::infrastructure::Z3Solver::new())
    }
    #[cfg(not(feature = "z3-solver"))]
    {
        Box::new(IntervalSolver::new())
    }
}

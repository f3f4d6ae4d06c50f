pub mod constraint_solver;

pub use constraint_solver::{CheckResult, ConstraintSolver, Model};

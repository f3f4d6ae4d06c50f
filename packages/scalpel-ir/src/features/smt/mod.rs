//! Constraint solving seam for the symbolic executor (spec.md §4.6: part
//! of C6, split out as its own feature slice since both
//! `symbolic_execution` and, indirectly, `refactor`'s equivalence check
//! depend on it).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::default_solver;
pub use domain::{ConcreteValue, Formula, Sort};
pub use ports::{CheckResult, ConstraintSolver, Model};

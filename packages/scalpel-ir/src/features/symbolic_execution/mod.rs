//! Symbolic executor (spec.md §4.6: C6) — worklist path exploration over
//! an `Ir` `FunctionDef`, fuel-bounded loops, SMT-backed feasibility
//! pruning via [`crate::features::smt`], and generic test-case synthesis.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{symbolic_execute, SymbolicExecutionResult};
pub use domain::{Path, PathStatus, SymbolicState, SymbolicValue, TestCase};
pub use infrastructure::ExecutionKnobs;

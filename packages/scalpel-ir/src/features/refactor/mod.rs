//! Refactor Simulator (spec.md §4.10: C10) — behavioral-equivalence and
//! safety checking for a proposed edit, built on top of the structural
//! diff, taint engine, and symbolic executor the kernel already has.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{simulate_refactor, RefactorInput};
pub use domain::{ChangeKind, ChangeRecord, Equivalence, RefactorResult};

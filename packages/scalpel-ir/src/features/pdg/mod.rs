//! Program Dependence Graph (spec.md §4.4: C4) — control- and
//! data-dependence edges over a function's IR.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::build_pdg;
pub use domain::{DependenceEdge, ProgramDependenceGraph};

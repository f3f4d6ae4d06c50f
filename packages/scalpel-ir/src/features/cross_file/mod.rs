//! Symbol & reference index (spec.md §4.3: C3) — per-module symbol tables,
//! cross-module import resolution, and the project call graph.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::build_project_index;
pub use domain::{ProjectIndex, ResolvedImport, UnresolvedReference};

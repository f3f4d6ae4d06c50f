//! Feature-first vertical slices (spec.md §4): each owns its
//! `domain`/`ports`/`application`/`infrastructure` layers and is wired
//! together only through the shared kernel in `crate::shared`.

pub mod cache;
pub mod cross_file;
pub mod dispatcher;
pub mod parsing;
pub mod pdg;
pub mod policy;
pub mod refactor;
pub mod smt;
pub mod symbolic_execution;
pub mod taint_analysis;

pub mod pdg;

pub use pdg::{DependenceEdge, ProgramDependenceGraph};

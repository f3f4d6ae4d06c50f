pub mod symbolic_execute;

pub use symbolic_execute::{symbolic_execute, SymbolicExecutionResult};

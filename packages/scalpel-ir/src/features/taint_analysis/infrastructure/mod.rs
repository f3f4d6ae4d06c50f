pub mod callee_path;
pub mod function_index;
pub mod registry;
pub mod walker;

pub mod build_project_index;

pub use build_project_index::build_project_index;

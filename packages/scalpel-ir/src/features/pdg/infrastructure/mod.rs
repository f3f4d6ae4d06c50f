pub mod cfg_builder;
pub mod reaching_definitions;

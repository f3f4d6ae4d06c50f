//! Domain types for the parsing feature.
pub mod import_statement;
pub mod parsed_module;

pub use import_statement::ImportStatement;
pub use parsed_module::ParsedModule;

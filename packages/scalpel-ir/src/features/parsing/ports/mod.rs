//! Trait boundary between tree-sitter grammars and the shared IR.
pub mod language_frontend;

pub use language_frontend::{FrontendOutput, FrontendRegistry, LanguageFrontend};

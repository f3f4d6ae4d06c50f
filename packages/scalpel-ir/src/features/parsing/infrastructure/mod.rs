//! Tree-sitter-backed implementations of the `LanguageFrontend` port.
pub mod frontends;
pub mod lowering;

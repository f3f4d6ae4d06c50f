//! Use cases built on top of the language frontend port.
pub mod parse_file;

pub use parse_file::parse_file;

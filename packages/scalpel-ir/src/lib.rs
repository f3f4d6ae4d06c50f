//! Code Scalpel kernel.
//!
//! Multi-language IR, symbol/reference indexing, program dependence graphs,
//! a taint engine, a symbolic executor, a tiered analysis cache, the policy
//! tier gate, and the JSON-RPC tool dispatcher consumed by AI coding agents.
//!
//! Feature-First Hexagonal Architecture:
//! - `shared/`   : common models (`Ir`, `SourceSpan`, `SymbolTable`, `CallGraph`, ...)
//! - `features/` : vertical slices, each with `domain/ports/application/infrastructure`
//! - `errors`    : crate-wide error type, mapped onto the dispatcher's error-code taxonomy

#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::module_inception)]

pub mod errors;
pub mod features;
pub mod shared;

pub use errors::{Result, ScalpelError};

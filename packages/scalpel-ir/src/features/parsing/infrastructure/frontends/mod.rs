//! One module per supported grammar, plus the shared ECMAScript lowering
//! used by both `javascript` and `typescript`.
mod ecma;

pub mod java;
pub mod javascript;
pub mod python;
pub mod typescript;

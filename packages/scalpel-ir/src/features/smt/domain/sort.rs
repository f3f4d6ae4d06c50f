//! Symbolic value sorts (spec.md §3 "Symbolic State": `SymbolicValue`
//! carries one of these).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Sort {
    Int,
    Bool,
    String,
    Real,
    BitVec(u32),
    Array(Box<Sort>, Box<Sort>),
}

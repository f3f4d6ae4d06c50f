//! A completed (or bounded) execution path (spec.md §4.6 "Output: a set of
//! `Path { path_condition, store, status, witness? }`").

use serde::{Deserialize, Serialize};

use crate::features::smt::ports::Model;
use crate::features::smt::domain::Formula;

use super::state::{LoopAnnotation, SymbolicState};
use super::symbolic_value::SymbolicValue;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    Feasible,
    Infeasible,
    Bounded,
    Error,
}

/// How a path ended — `Path` itself doesn't distinguish "returned" from
/// "raised" (spec.md's `Path` record has no such field), but the symbolic
/// executor's test-case synthesis needs it, so it lives alongside the path
/// rather than inside the spec's own record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Terminal {
    Returned(Option<SymbolicValue>),
    Raised(Option<SymbolicValue>),
    /// Exploration stopped without reaching a `Return`/`Raise` (fuel or
    /// path-count exhaustion).
    Truncated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub path_condition: Vec<Formula>,
    pub store: HashMap<String, SymbolicValue>,
    pub status: PathStatus,
    pub witness: Option<Model>,
    pub annotations: Vec<LoopAnnotation>,
    pub terminal: Terminal,
}

impl Path {
    pub fn from_state(state: SymbolicState, status: PathStatus, witness: Option<Model>, terminal: Terminal) -> Self {
        Path { path_condition: state.path_condition, store: state.store, status, witness, annotations: state.annotations, terminal }
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self.status, PathStatus::Bounded)
    }
}

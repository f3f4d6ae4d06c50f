//! Per-path symbolic execution state (spec.md §3 "Symbolic State").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::smt::domain::Formula;
use crate::shared::span::SourceSpan;

use super::symbolic_value::SymbolicValue;

/// Recorded when a loop exhausts its fuel mid-path (spec.md §4.6: "the path
/// is marked `Bounded` with an annotation `{ loop_span, iterations_completed }`").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopAnnotation {
    pub loop_span: SourceSpan,
    pub iterations_completed: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolicState {
    pub store: HashMap<String, SymbolicValue>,
    pub path_condition: Vec<Formula>,
    pub loop_fuel: HashMap<String, u32>,
    pub annotations: Vec<LoopAnnotation>,
}

impl SymbolicState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, name: impl Into<String>, value: SymbolicValue) {
        self.store.insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> SymbolicValue {
        self.store.get(name).cloned().unwrap_or_else(|| SymbolicValue::symbolic(name, crate::features::smt::domain::Sort::Int))
    }

    pub fn with_condition(&self, condition: Formula) -> Self {
        let mut next = self.clone();
        next.path_condition.push(condition);
        next
    }
}

//! Universal Node ID (spec.md §3).
//!
//! `id = "{lang}:{relative_path}:{start_line}:{start_col}:{symbol_name_or_synthetic}"`
//!
//! Determinism invariant: re-parsing unchanged bytes yields identical IDs —
//! the format intentionally carries no hash or counter, only positional and
//! nominal information already fixed by the source text itself.

use crate::shared::ports::Language;

pub type NodeId = String;

/// A monotonic counter for synthetic symbol names (anonymous lambdas,
/// desugared comprehension bodies, …) scoped to one file's lowering pass.
#[derive(Debug, Default)]
pub struct SyntheticCounter(u32);

impl SyntheticCounter {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn next(&mut self, kind: &str) -> String {
        let n = self.0;
        self.0 += 1;
        format!("<{kind}#{n}>")
    }
}

pub fn node_id(
    lang: Language,
    relative_path: &str,
    start_line: u32,
    start_col: u32,
    symbol_name_or_synthetic: &str,
) -> NodeId {
    format!(
        "{}:{}:{}:{}:{}",
        lang.name(),
        relative_path,
        start_line,
        start_col,
        symbol_name_or_synthetic
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_inputs() {
        let a = node_id(Language::Python, "a.py", 3, 0, "process_data");
        let b = node_id(Language::Python, "a.py", 3, 0, "process_data");
        assert_eq!(a, b);
    }

    #[test]
    fn distinguishes_language_and_position() {
        let py = node_id(Language::Python, "a.py", 3, 0, "f");
        let js = node_id(Language::JavaScript, "a.py", 3, 0, "f");
        assert_ne!(py, js);

        let moved = node_id(Language::Python, "a.py", 4, 0, "f");
        assert_ne!(py, moved);
    }

    #[test]
    fn synthetic_counter_is_monotonic_and_unique() {
        let mut counter = SyntheticCounter::new();
        let a = counter.next("lambda");
        let b = counter.next("lambda");
        assert_ne!(a, b);
    }
}

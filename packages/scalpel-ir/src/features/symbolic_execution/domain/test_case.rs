//! Generic test-case records synthesized from feasible paths (spec.md
//! §4.6: "concrete inputs are emitted as test cases in a generic form").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::smt::domain::ConcreteValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub inputs: HashMap<String, ConcreteValue>,
    pub expected_output: Option<ConcreteValue>,
    /// Set when the generating path was `Bounded` rather than fully
    /// `Feasible` (spec.md §4.6: "Emitted tests are marked `uncertain=true`
    /// if the path is `Bounded`").
    pub uncertain: bool,
    pub raises: bool,
}

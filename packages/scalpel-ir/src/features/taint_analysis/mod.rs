//! Taint engine (spec.md §4.5: C5) — source/sink/sanitizer recognition and
//! inter-procedural taint propagation over the IR and the project call
//! graph built by `cross_file`.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{scan_module, scan_project};
pub use domain::{Finding, FindingSeverity, ScanOutcome, SinkCategory, TaintInfo, TaintLevel, TaintMap};
pub use infrastructure::registry::TaintConfig;
pub use infrastructure::walker::Limits;

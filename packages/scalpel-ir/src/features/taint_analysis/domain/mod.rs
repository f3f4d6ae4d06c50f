//! Domain types for the taint engine (spec.md §4.5: C5).

pub mod taint;

pub use taint::{
    Finding, FindingSeverity, ScanOutcome, SinkCategory, TaintInfo, TaintLevel, TaintMap,
    TruncationReason,
};

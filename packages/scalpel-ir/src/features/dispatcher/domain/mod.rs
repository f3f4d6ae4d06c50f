//! Domain types for the tool dispatcher (spec.md §4.9: C9).

pub mod audit;
pub mod context;
pub mod envelope;

pub use audit::{AuditRecord, AuditSink, NullAuditSink};
pub use context::Context;
pub use envelope::{Envelope, ErrorCode, ErrorObject, Suggestion};

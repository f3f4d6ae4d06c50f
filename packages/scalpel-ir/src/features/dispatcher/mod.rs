//! Tool Dispatcher (spec.md §4.9: C9) — the public surface of the kernel.
//! Every analysis capability is reached through [`dispatch`] and returns an
//! [`Envelope`]; no caller talks to a feature module directly.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{dispatch, ToolRegistry};
pub use domain::{AuditRecord, AuditSink, Context, Envelope, ErrorCode, ErrorObject, NullAuditSink, Suggestion};
pub use infrastructure::JsonlAuditSink;
pub use ports::ToolHandler;

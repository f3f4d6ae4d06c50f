//! Audit record shape and write-only sink port (spec.md §4.9 "Audit
//! record", §5 "Shared-resource policy").

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::features::policy::domain::Tier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub tool_id: String,
    pub request_id: String,
    pub tier: Tier,
    pub input_hash: String,
    pub output_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub duration_ms: u64,
}

/// Write-only: the dispatcher never reads prior entries back (spec.md
/// §4.9).
pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord) -> Result<()>;
}

pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _record: &AuditRecord) -> Result<()> {
        Ok(())
    }
}

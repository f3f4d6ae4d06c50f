//! Append-only JSONL audit sink (spec.md §6 "Audit log": one JSON object
//! per line, UTF-8, LF-terminated; default path `.scalpel/audit.jsonl`).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::{Result, ScalpelError};
use crate::features::dispatcher::domain::{AuditRecord, AuditSink};

pub struct JsonlAuditSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, record: &AuditRecord) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(ScalpelError::from)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(ScalpelError::from)?;
        let line = serde_json::to_string(record).map_err(|e| ScalpelError::internal(e.to_string()))?;
        writeln!(file, "{line}").map_err(ScalpelError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::policy::domain::Tier;

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = JsonlAuditSink::new(&path);
        let record = AuditRecord {
            timestamp: "2026-07-28T00:00:00Z".into(),
            tool_id: "security_scan".into(),
            request_id: "r1".into(),
            tier: Tier::Community,
            input_hash: "a".into(),
            output_hash: "b".into(),
            error_code: None,
            duration_ms: 12,
        };
        sink.record(&record).unwrap();
        sink.record(&record).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}

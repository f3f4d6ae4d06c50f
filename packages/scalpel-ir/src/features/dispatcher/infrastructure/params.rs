//! Small helpers for pulling typed fields out of a tool call's JSON params
//! (spec.md §4.9: each handler enforces its own input schema).

use serde_json::Value;

use crate::features::dispatcher::domain::{ErrorCode, ErrorObject};

pub fn require_str(params: &Value, field: &str) -> Result<String, ErrorObject> {
    params
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ErrorObject::new(ErrorCode::InvalidInput, format!("missing or non-string field `{field}`")))
}

pub fn optional_str(params: &Value, field: &str) -> Option<String> {
    params.get(field).and_then(Value::as_str).map(str::to_string)
}

pub fn optional_u64(params: &Value, field: &str) -> Option<u64> {
    params.get(field).and_then(Value::as_u64)
}

pub fn optional_bool(params: &Value, field: &str, default: bool) -> bool {
    params.get(field).and_then(Value::as_bool).unwrap_or(default)
}

/// `[{ "path": ..., "source": ... }, ...]` — the shape every project-wide
/// tool takes for the rest of the project, since this crate is a library
/// invoked with file contents already in hand rather than a filesystem walker.
pub fn require_files(params: &Value, field: &str) -> Result<Vec<(String, String)>, ErrorObject> {
    let array = params
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| ErrorObject::new(ErrorCode::InvalidInput, format!("missing or non-array field `{field}`")))?;
    array
        .iter()
        .map(|entry| {
            let path = entry
                .get("path")
                .and_then(Value::as_str)
                .ok_or_else(|| ErrorObject::new(ErrorCode::InvalidInput, "each project file needs a `path`"))?;
            let source = entry
                .get("source")
                .and_then(Value::as_str)
                .ok_or_else(|| ErrorObject::new(ErrorCode::InvalidInput, "each project file needs `source`"))?;
            Ok((path.to_string(), source.to_string()))
        })
        .collect()
}

pub fn optional_files(params: &Value, field: &str) -> Vec<(String, String)> {
    require_files(params, field).unwrap_or_default()
}

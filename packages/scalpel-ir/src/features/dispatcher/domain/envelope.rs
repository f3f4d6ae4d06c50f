//! The response envelope every tool call returns (spec.md §3 "Envelope",
//! §4.9: C9).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::policy::domain::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    CorrectionNeeded,
    TierDenied,
    LimitExceeded,
    Timeout,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default)]
    pub error_details: Value,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl ErrorObject {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), error_details: Value::Null, suggestions: Vec::new() }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error_details = details;
        self
    }

    pub fn tier_denied(message: impl Into<String>, required_tier: Tier) -> Self {
        Self::new(ErrorCode::TierDenied, message)
            .with_details(serde_json::json!({ "required_tier": required_tier.name() }))
    }
}

/// Every response is one of these (spec.md §4.9): `error == null` and
/// `data != null` are complementary, never both set, never both null.
///
/// `tier` is the tier resolved for the calling session before any
/// request-level clamping; `tier_applied` is what this particular call
/// actually ran under. The two only diverge once a trusted-caller
/// `tier_override` path exists (spec.md §6 leaves this to the embedder) —
/// until then both fields mirror the same resolved [`Tier`], kept distinct
/// for schema fidelity rather than collapsed into one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub tool_id: String,
    pub request_id: String,
    pub tier: Tier,
    pub tier_applied: Tier,
    pub limits_applied: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub truncation_reason: Option<String>,
    pub duration_ms: u64,
}

impl Envelope {
    #[allow(clippy::too_many_arguments)]
    pub fn ok(
        tool_id: impl Into<String>,
        request_id: impl Into<String>,
        tier_applied: Tier,
        limits_applied: Value,
        data: Value,
        duration_ms: u64,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            request_id: request_id.into(),
            tier: tier_applied,
            tier_applied,
            limits_applied,
            data: Some(data),
            error: None,
            truncated: false,
            truncation_reason: None,
            duration_ms,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn err(
        tool_id: impl Into<String>,
        request_id: impl Into<String>,
        tier_applied: Tier,
        limits_applied: Value,
        error: ErrorObject,
        duration_ms: u64,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            request_id: request_id.into(),
            tier: tier_applied,
            tier_applied,
            limits_applied,
            data: None,
            error: Some(error),
            truncated: false,
            truncation_reason: None,
            duration_ms,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

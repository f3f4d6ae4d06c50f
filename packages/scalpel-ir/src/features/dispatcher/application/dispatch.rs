//! The dispatcher's single entry point (spec.md §4.9): looks up a
//! handler, times the call, applies the cross-cutting concerns no handler
//! implements itself — oracle-hint enhancement, audit recording — and
//! wraps everything into an [`Envelope`].

use serde_json::Value;

use crate::features::dispatcher::domain::{AuditRecord, Context, Envelope, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::fuzzy_match;
use crate::features::dispatcher::ports::ToolHandler;

use super::registry::ToolRegistry;

const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 5;

pub fn dispatch(registry: &ToolRegistry, ctx: &Context, tool_id: &str, request_id: &str, params: Value) -> Envelope {
    let started = std::time::Instant::now();
    let input_hash = hash_value(&params);
    let limits_applied = serde_json::to_value(&ctx.limits).unwrap_or(Value::Null);

    let Some(handler) = registry.get(tool_id) else {
        let error = ErrorObject::new(ErrorCode::NotFound, format!("no tool registered for `{tool_id}`"));
        let duration_ms = elapsed_ms(started);
        let envelope = Envelope::err(tool_id, request_id, ctx.tier, limits_applied, error, duration_ms);
        record_audit(ctx, tool_id, request_id, &envelope, &input_hash);
        return envelope;
    };

    let outcome = handler.call(ctx, params);
    let duration_ms = elapsed_ms(started);

    let envelope = match outcome {
        Ok(data) => {
            let output_hash = hash_value(&data);
            let envelope = Envelope::ok(tool_id, request_id, ctx.tier, limits_applied, data, duration_ms);
            record_audit_with_output(ctx, tool_id, request_id, &envelope, &input_hash, &output_hash);
            tracing::debug!(tool_id, request_id, duration_ms, "dispatch ok");
            envelope
        }
        Err(error) => {
            let error = enhance_with_oracle_hints(error, handler.as_ref(), ctx);
            tracing::warn!(tool_id, request_id, error_code = ?error.code, "dispatch error");
            let envelope = Envelope::err(tool_id, request_id, ctx.tier, limits_applied, error, duration_ms);
            record_audit(ctx, tool_id, request_id, &envelope, &input_hash);
            envelope
        }
    };

    envelope
}

/// spec.md §4.9: "when a handler returns an error whose message indicates
/// a not-found symbol or path, the dispatcher post-processes the envelope".
/// The handler flags the offending name in `error_details.offending_name`
/// (every `not_found` handler in this crate populates it); the dispatcher
/// reads that field rather than re-parsing the message text.
///
/// Candidate names to fuzzy-match against come from `error_details.
/// known_names` when the handler included one (it already has the parsed
/// file/project in hand and can list its own symbols cheaply), falling
/// back to [`ToolHandler::known_names`] for handlers backed by
/// project-wide state that outlives a single call.
fn enhance_with_oracle_hints(error: ErrorObject, handler: &dyn ToolHandler, ctx: &Context) -> ErrorObject {
    if error.code != ErrorCode::NotFound {
        return error;
    }
    let Some(offending_name) = error.error_details.get("offending_name").and_then(Value::as_str) else {
        return error;
    };

    let known_names: Vec<String> = match error.error_details.get("known_names").and_then(Value::as_array) {
        Some(names) => names.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        None => handler.known_names(ctx),
    };
    if known_names.is_empty() {
        return error;
    }

    let suggestions = fuzzy_match::suggest(offending_name, &known_names, SUGGESTION_THRESHOLD, MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        return error;
    }

    ErrorObject { code: ErrorCode::CorrectionNeeded, suggestions, ..error }
}

fn record_audit(ctx: &Context, tool_id: &str, request_id: &str, envelope: &Envelope, input_hash: &str) {
    record_audit_with_output(ctx, tool_id, request_id, envelope, input_hash, "");
}

fn record_audit_with_output(
    ctx: &Context,
    tool_id: &str,
    request_id: &str,
    envelope: &Envelope,
    input_hash: &str,
    output_hash: &str,
) {
    if !ctx.limits.audit_logging {
        return;
    }
    let record = AuditRecord {
        timestamp: crate::shared::clock::now_rfc3339(),
        tool_id: tool_id.to_string(),
        request_id: request_id.to_string(),
        tier: ctx.tier,
        input_hash: input_hash.to_string(),
        output_hash: output_hash.to_string(),
        error_code: envelope.error.as_ref().map(|e| format!("{:?}", e.code)),
        duration_ms: envelope.duration_ms,
    };
    let _ = ctx.audit_sink.record(&record);
}

fn hash_value(value: &Value) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

fn elapsed_ms(started: std::time::Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatcher::domain::NullAuditSink;
    use crate::features::policy::{evaluate, RequestedOptions, Tier};
    use serde_json::json;
    use std::sync::Arc;

    fn ctx() -> Context {
        Context {
            tier: Tier::Pro,
            limits: evaluate(Tier::Pro, &RequestedOptions::default()),
            cache: None,
            policy: None,
            audit_sink: Arc::new(NullAuditSink),
        }
    }

    #[test]
    fn an_unregistered_tool_id_returns_a_not_found_envelope() {
        let registry = ToolRegistry::with_core_tools();
        let envelope = dispatch(&registry, &ctx(), "no_such_tool", "r1", json!({}));
        assert!(!envelope.is_ok());
        assert_eq!(envelope.error.unwrap().code, ErrorCode::NotFound);
    }

    #[test]
    fn a_successful_call_produces_a_data_carrying_envelope() {
        let registry = ToolRegistry::with_core_tools();
        let params = json!({
            "file_path": "a.py",
            "source": "def f(x):\n    return x\n",
            "target_name": "f",
        });
        let envelope = dispatch(&registry, &ctx(), "extract_code", "r2", params);
        assert!(envelope.is_ok());
        assert_eq!(envelope.tool_id, "extract_code");
    }

    #[test]
    fn a_near_miss_symbol_name_gets_oracle_hint_suggestions() {
        let registry = ToolRegistry::with_core_tools();
        let params = json!({
            "file_path": "a.py",
            "source": "def calculate_total(x):\n    return x\n",
            "target_name": "calculate_totla",
        });
        let envelope = dispatch(&registry, &ctx(), "extract_code", "r3", params);
        let error = envelope.error.unwrap();
        assert_eq!(error.code, ErrorCode::CorrectionNeeded);
        assert!(!error.suggestions.is_empty());
    }
}

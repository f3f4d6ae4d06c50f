//! End-to-end coverage through the dispatcher's public entry point,
//! reproducing the literal scenarios spec.md §8 exercises against the
//! running kernel rather than a single feature slice in isolation.

use scalpel_ir::features::dispatcher::domain::{Context, ErrorCode, NullAuditSink};
use scalpel_ir::features::dispatcher::{dispatch, ToolRegistry};
use scalpel_ir::features::policy::{evaluate, RequestedOptions, Tier};
use serde_json::json;
use std::sync::Arc;

fn ctx_for(tier: Tier) -> Context {
    Context {
        tier,
        limits: evaluate(tier, &RequestedOptions::default()),
        cache: None,
        policy: None,
        audit_sink: Arc::new(NullAuditSink),
    }
}

#[test]
fn fake_sanitizer_yields_exactly_one_high_confidence_xss_finding() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({
        "file_path": "a.py",
        "source": "def sanitize(x):\n    return x\nfrom flask import request\n@app.route(\"/h\")\ndef h():\n    return f\"<div>{sanitize(request.args.get('q'))}</div>\"\n",
    });
    let envelope = dispatch(&registry, &ctx_for(Tier::Pro), "security_scan", "scenario-1", params);
    assert!(envelope.is_ok());
    let data = envelope.data.unwrap();
    let findings = data["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["sink_category"], "Xss");
    assert!(findings[0]["confidence"].as_f64().unwrap() >= 0.8);
}

#[test]
fn cross_file_sql_injection_is_denied_outright_at_community_tier() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({ "files": [
        { "path": "handlers.py", "source": "from repo import query\nfrom flask import request\n\ndef handler():\n    id = request.args.get(\"id\")\n    query(id)\n" },
        { "path": "repo.py", "source": "def query(id):\n    cursor.execute(f\"SELECT * FROM u WHERE id={id}\")\n" },
    ]});
    let envelope = dispatch(&registry, &ctx_for(Tier::Community), "cross_file_security_scan", "scenario-2", params);
    assert!(!envelope.is_ok());
    assert_eq!(envelope.error.unwrap().code, ErrorCode::TierDenied);
}

#[test]
fn cross_file_sql_injection_is_found_at_pro_tier() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({ "files": [
        { "path": "handlers.py", "source": "from repo import query\nfrom flask import request\n\ndef handler():\n    id = request.args.get(\"id\")\n    query(id)\n" },
        { "path": "repo.py", "source": "def query(id):\n    cursor.execute(f\"SELECT * FROM u WHERE id={id}\")\n" },
    ]});
    let envelope = dispatch(&registry, &ctx_for(Tier::Pro), "cross_file_security_scan", "scenario-2b", params);
    assert!(envelope.is_ok());
}

#[test]
fn symbolic_edge_case_surfaces_the_narrow_witness() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({
        "file_path": "f.py",
        "source": "def f(code):\n    if code > 500 and code < 505 and code == 503:\n        raise ValueError('x')\n",
        "target_name": "f",
    });
    let envelope = dispatch(&registry, &ctx_for(Tier::Pro), "symbolic_execute", "scenario-3", params);
    assert!(envelope.is_ok());
    let paths = envelope.data.unwrap()["paths"].as_array().unwrap().len();
    assert!(paths >= 2);
}

#[test]
fn rename_into_a_sql_literal_is_reported_unsafe() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({
        "file_path": "m.py",
        "source": "def handler(user_id):\n    return user_id\n",
        "old_name": "user_id",
        "new_name": "account_id",
        "project_files": [{ "path": "report.sql", "source": "SELECT user_id FROM users\n" }],
    });
    let envelope = dispatch(&registry, &ctx_for(Tier::Pro), "rename_symbol", "scenario-4", params);
    assert!(envelope.is_ok());
    assert_eq!(envelope.data.unwrap()["is_safe"], false);
}

#[test]
fn oracle_correction_suggests_the_near_miss_symbol_name() {
    let registry = ToolRegistry::with_core_tools();
    let params = json!({
        "file_path": "a.py",
        "source": "def process_data(x):\n    return x + 1\n",
        "target_name": "proces_data",
    });
    let envelope = dispatch(&registry, &ctx_for(Tier::Pro), "extract_code", "scenario-5", params);
    assert!(!envelope.is_ok());
    let error = envelope.error.unwrap();
    assert_eq!(error.code, ErrorCode::CorrectionNeeded);
    assert!(error.suggestions.iter().any(|s| s.name == "process_data" && s.score >= 0.9));
}

#[test]
fn tier_denial_reports_the_required_tier() {
    let registry = ToolRegistry::with_core_tools();
    let envelope = dispatch(&registry, &ctx_for(Tier::Community), "cross_file_security_scan", "scenario-6", json!({ "files": [] }));
    let error = envelope.error.unwrap();
    assert_eq!(error.code, ErrorCode::TierDenied);
    assert_eq!(error.error_details["required_tier"], "pro");
}

#[test]
fn every_audit_enabled_call_produces_one_audit_record() {
    struct CountingSink(std::sync::Mutex<u32>);
    impl scalpel_ir::features::dispatcher::domain::AuditSink for CountingSink {
        fn record(&self, _record: &scalpel_ir::features::dispatcher::domain::AuditRecord) -> scalpel_ir::Result<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    let registry = ToolRegistry::with_core_tools();
    let sink = Arc::new(CountingSink(std::sync::Mutex::new(0)));
    let ctx = Context {
        tier: Tier::Pro,
        limits: evaluate(Tier::Pro, &RequestedOptions::default()),
        cache: None,
        policy: None,
        audit_sink: sink.clone(),
    };

    let params = json!({ "dependencies": [{ "name": "pyyaml", "version": "5.3.0" }] });
    dispatch(&registry, &ctx, "scan_dependencies", "audit-1", params);
    assert_eq!(*sink.0.lock().unwrap(), 1);
}

//! Governance tools (spec.md §4.9): `code_policy_check`, `verify_policy_integrity`.

use serde_json::{json, Value};

use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::params::{require_files, require_str};
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::parsing::{default_registry, parse_file};
use crate::features::policy::domain::PolicyDocument;
use crate::features::policy::infrastructure::signature;
use crate::features::taint_analysis::{scan_module, SinkCategory, TaintConfig};
use crate::shared::ports::Language;

/// `code_policy_check` (spec.md §4.9 "Governance"): runs the security
/// scanner over a project and reports whether findings stay inside the
/// active policy's limits and disallowed-sink-category flags (spec.md §4.8
/// "capability/limit table", §6 "policy document"). Distinct from
/// `security_scan`/`cross_file_security_scan` (C9's own security family),
/// which only report findings — this tool judges them against policy.
pub struct CodePolicyCheckTool;

impl ToolHandler for CodePolicyCheckTool {
    fn id(&self) -> &'static str {
        "code_policy_check"
    }

    fn call(&self, ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let files = require_files(&params, "files")?;
        let registry = default_registry();
        let config = TaintConfig::default_config();

        let mut all_findings = Vec::new();
        for (path, source) in &files {
            if Language::from_file_path(path).is_none() {
                continue;
            }
            let Ok(module) = parse_file(&registry, path, source) else { continue };
            let outcome = scan_module(&module, &config);
            all_findings.extend(outcome.findings);
        }

        let disallowed_sinks = disallowed_sink_categories(ctx.policy.as_ref());
        let max_findings = ctx
            .policy
            .as_ref()
            .and_then(|doc| doc.capabilities.limits.get("max_findings"))
            .copied()
            .or(ctx.limits.max_findings);

        let mut violations = Vec::new();
        for finding in &all_findings {
            if disallowed_sinks.contains(&finding.sink_category) {
                violations.push(json!({
                    "kind": "disallowed_sink_category",
                    "sink_category": format!("{:?}", finding.sink_category),
                    "span": finding.sink,
                }));
            }
        }
        if let Some(cap) = max_findings {
            if all_findings.len() as u64 > cap {
                violations.push(json!({
                    "kind": "finding_count_exceeds_policy_limit",
                    "count": all_findings.len(),
                    "limit": cap,
                }));
            }
        }

        Ok(json!({
            "compliant": violations.is_empty(),
            "violations": violations,
            "findings_count": all_findings.len(),
            "findings": all_findings,
        }))
    }
}

fn disallowed_sink_categories(policy: Option<&PolicyDocument>) -> Vec<SinkCategory> {
    let Some(policy) = policy else { return Vec::new() };
    policy
        .capabilities
        .feature_flags
        .iter()
        .filter(|(_, allowed)| !**allowed)
        .filter_map(|(flag, _)| parse_sink_flag(flag))
        .collect()
}

fn parse_sink_flag(flag: &str) -> Option<SinkCategory> {
    let name = flag.strip_prefix("allow_sink_")?;
    Some(match name {
        "sql" => SinkCategory::Sql,
        "command" => SinkCategory::Command,
        "xss" => SinkCategory::Xss,
        "path" => SinkCategory::Path,
        "deserialize" => SinkCategory::Deserialize,
        "ssrf" => SinkCategory::Ssrf,
        "ldap" => SinkCategory::Ldap,
        "nosql" => SinkCategory::Nosql,
        _ => return None,
    })
}

/// `verify_policy_integrity` (spec.md §4.9, §4.8 "integrity-checked when
/// `policy_signing_required=on`"): checks a policy document's signature
/// against a configured public key without applying the document.
pub struct VerifyPolicyIntegrityTool;

impl ToolHandler for VerifyPolicyIntegrityTool {
    fn id(&self) -> &'static str {
        "verify_policy_integrity"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let document_text = require_str(&params, "policy_document")?;
        let public_key_b64 = require_str(&params, "public_key")?;

        let document: PolicyDocument = serde_yaml::from_str(&document_text)
            .or_else(|_| serde_json::from_str(&document_text))
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("policy_document did not parse: {e}")))?;

        let public_key = base64_decode(&public_key_b64)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("public_key was not valid base64: {e}")))?;

        let valid = signature::verify(&document, &public_key);

        Ok(json!({
            "valid": valid,
            "tier_name": document.tier_name,
            "signer_key_id": document.signer_key_id,
        }))
    }
}

fn base64_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatcher::domain::NullAuditSink;
    use crate::features::policy::{evaluate, RequestedOptions, Tier};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ctx_with_policy(policy: Option<PolicyDocument>) -> Context {
        Context {
            tier: Tier::Pro,
            limits: evaluate(Tier::Pro, &RequestedOptions::default()),
            cache: None,
            policy,
            audit_sink: Arc::new(NullAuditSink),
        }
    }

    #[test]
    fn xss_finding_is_flagged_when_policy_disallows_the_xss_sink() {
        let mut feature_flags = HashMap::new();
        feature_flags.insert("allow_sink_xss".to_string(), false);
        let policy = PolicyDocument {
            tier_name: "pro".into(),
            capabilities: crate::features::policy::domain::Capabilities { feature_flags, limits: HashMap::new() },
            signature: None,
            signer_key_id: None,
        };

        let tool = CodePolicyCheckTool;
        let params = json!({
            "files": [{
                "path": "a.py",
                "source": "from flask import request\n@app.route(\"/h\")\ndef h():\n    return f\"<div>{request.args.get('q')}</div>\"\n",
            }],
        });
        let result = tool.call(&ctx_with_policy(Some(policy)), params).unwrap();
        assert!(!result["compliant"].as_bool().unwrap());
        assert_eq!(result["violations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn no_policy_document_means_no_disallowed_sinks_and_compliant_output() {
        let tool = CodePolicyCheckTool;
        let params = json!({ "files": [] });
        let result = tool.call(&ctx_with_policy(None), params).unwrap();
        assert!(result["compliant"].as_bool().unwrap());
    }

    #[test]
    fn a_correctly_signed_document_verifies_through_the_tool() {
        let document = PolicyDocument {
            tier_name: "enterprise".into(),
            capabilities: crate::features::policy::domain::Capabilities::default(),
            signature: None,
            signer_key_id: Some("key-1".into()),
        };
        let key = b"integration-test-key";
        let mut signed = document.clone();
        signed.signature = Some(signature::sign(&document, key));

        let public_key_b64 = {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(key)
        };

        let tool = VerifyPolicyIntegrityTool;
        let params = json!({
            "policy_document": serde_json::to_string(&signed).unwrap(),
            "public_key": public_key_b64,
        });
        let result = tool.call(&ctx_with_policy(None), params).unwrap();
        assert!(result["valid"].as_bool().unwrap());
    }
}

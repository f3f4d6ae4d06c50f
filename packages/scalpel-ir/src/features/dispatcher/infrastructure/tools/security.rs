//! Security tools (spec.md §4.9): `security_scan`, `cross_file_security_scan`,
//! `scan_dependencies`.

use serde_json::{json, Value};

use crate::features::cross_file::build_project_index;
use crate::features::dispatcher::domain::{Context, ErrorCode, ErrorObject};
use crate::features::dispatcher::infrastructure::params::{require_files, require_str};
use crate::features::dispatcher::ports::ToolHandler;
use crate::features::parsing::{default_registry, parse_file};
use crate::features::taint_analysis::{scan_module, scan_project, Limits, TaintConfig};
use crate::shared::ports::Language;

pub struct SecurityScanTool;

impl ToolHandler for SecurityScanTool {
    fn id(&self) -> &'static str {
        "security_scan"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let file_path = require_str(&params, "file_path")?;
        let source = require_str(&params, "source")?;

        let registry = default_registry();
        let module = parse_file(&registry, &file_path, &source)
            .map_err(|e| ErrorObject::new(ErrorCode::InvalidInput, format!("{file_path} failed to parse: {e}")))?;

        let config = TaintConfig::default_config();
        let outcome = scan_module(&module, &config);
        Ok(serde_json::to_value(&outcome).unwrap_or(Value::Null))
    }
}

pub struct CrossFileSecurityScanTool;

impl ToolHandler for CrossFileSecurityScanTool {
    fn id(&self) -> &'static str {
        "cross_file_security_scan"
    }

    fn call(&self, ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        if !ctx.limits.cross_file_scan {
            return Err(ErrorObject::tier_denied(
                "cross_file_security_scan requires cross_file_scan, which this tier does not grant",
                crate::features::policy::Tier::Pro,
            ));
        }

        let files = require_files(&params, "files")?;
        let registry = default_registry();
        let modules: Vec<_> = files
            .iter()
            .filter_map(|(path, source)| {
                if Language::from_file_path(path).is_none() {
                    return None;
                }
                parse_file(&registry, path, source).ok()
            })
            .collect();
        let index = build_project_index(&modules);

        let limits = Limits {
            max_depth: ctx.limits.max_taint_depth.map(|d| d as u32).unwrap_or(u32::MAX),
            max_modules: ctx.limits.max_modules.map(|m| m as u32).unwrap_or(u32::MAX),
        };
        let config = TaintConfig::default_config();
        let outcome = scan_project(&modules, &index, &config, limits);
        Ok(serde_json::to_value(&outcome).unwrap_or(Value::Null))
    }
}

/// A minimal known-vulnerable-package catalogue standing in for the
/// external advisory feed spec.md §4.9 describes ("dependency list →
/// vulnerability records from an external catalogue"). Exact-version match
/// only; a real deployment points this at an OSV/GHSA mirror instead.
fn vulnerability_catalogue() -> &'static [(&'static str, &'static str, &'static str, &'static str)] {
    &[
        ("requests", "2.25.0", "CVE-2023-32681", "proxy credential leak via malicious redirect"),
        ("pyyaml", "5.3.0", "CVE-2020-14343", "arbitrary code execution via full_load/unsafe_load"),
        ("log4j-core", "2.14.1", "CVE-2021-44228", "remote code execution via JNDI lookup"),
        ("lodash", "4.17.15", "CVE-2020-8203", "prototype pollution"),
        ("minimist", "1.2.5", "CVE-2021-44906", "prototype pollution"),
    ]
}

pub struct ScanDependenciesTool;

impl ToolHandler for ScanDependenciesTool {
    fn id(&self) -> &'static str {
        "scan_dependencies"
    }

    fn call(&self, _ctx: &Context, params: Value) -> Result<Value, ErrorObject> {
        let dependencies = params
            .get("dependencies")
            .and_then(Value::as_array)
            .ok_or_else(|| ErrorObject::new(ErrorCode::InvalidInput, "missing or non-array field `dependencies`"))?;

        let catalogue = vulnerability_catalogue();
        let mut findings = Vec::new();
        for dep in dependencies {
            let Some(name) = dep.get("name").and_then(Value::as_str) else { continue };
            let Some(version) = dep.get("version").and_then(Value::as_str) else { continue };
            for (cat_name, cat_version, cve, description) in catalogue {
                if name.eq_ignore_ascii_case(cat_name) && version == *cat_version {
                    findings.push(json!({
                        "package": name,
                        "version": version,
                        "cve": cve,
                        "description": description,
                    }));
                }
            }
        }
        Ok(json!({ "vulnerabilities": findings, "dependencies_scanned": dependencies.len() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::dispatcher::domain::NullAuditSink;
    use crate::features::policy::{evaluate, RequestedOptions, Tier};
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
    fn a_fake_sanitizer_still_yields_an_xss_finding() {
        let tool = SecurityScanTool;
        let params = json!({
            "file_path": "a.py",
            "source": "def sanitize(x):\n    return x\nfrom flask import request\n@app.route(\"/h\")\ndef h():\n    return f\"<div>{sanitize(request.args.get('q'))}</div>\"\n",
        });
        let result = tool.call(&ctx_for(Tier::Pro), params).unwrap();
        let findings = result["findings"].as_array().unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0]["sink_category"], "Xss");
    }

    #[test]
    fn cross_file_scan_is_denied_at_community_tier() {
        let tool = CrossFileSecurityScanTool;
        let err = tool.call(&ctx_for(Tier::Community), json!({ "files": [] })).unwrap_err();
        assert_eq!(err.code, ErrorCode::TierDenied);
        assert_eq!(err.error_details["required_tier"], "pro");
    }

    #[test]
    fn scan_dependencies_flags_a_known_vulnerable_exact_version() {
        let tool = ScanDependenciesTool;
        let params = json!({ "dependencies": [{ "name": "pyyaml", "version": "5.3.0" }] });
        let result = tool.call(&ctx_for(Tier::Pro), params).unwrap();
        assert_eq!(result["vulnerabilities"].as_array().unwrap().len(), 1);
    }
}

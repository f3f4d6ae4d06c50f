//! Source/sink/sanitizer patterns (spec.md §4.5). Loaded once at startup
//! from a YAML document pointed to by `CS_POLICY_PATH`'s sibling taint
//! config (spec.md §6); [`TaintConfig::default`] ships the minimum set the
//! scanner needs when no document is supplied.

use serde::{Deserialize, Serialize};

use crate::features::taint_analysis::domain::taint::{SinkCategory, TaintLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePattern {
    pub callee_contains: String,
    pub level: TaintLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkPattern {
    pub callee_contains: String,
    pub category: SinkCategory,
    pub threshold: TaintLevel,
    pub cwe: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerPattern {
    pub callee_contains: String,
    pub clears: Vec<SinkCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaintConfig {
    pub sources: Vec<SourcePattern>,
    pub sinks: Vec<SinkPattern>,
    pub sanitizers: Vec<SanitizerPattern>,
    /// spec.md §4.2: f-strings, template literals, and `String.format` all
    /// lower to `Call(intrinsic="format", format_fragments=[...])` with a
    /// synthetic `format` callee, not a real call the project defines. A
    /// tainted value interpolated through one of these is itself the
    /// reflected-XSS sink (spec.md §8 scenario 1), so this is keyed on the
    /// `intrinsic` tag the walker already carries rather than folded into
    /// `sinks`' callee-text matching — matching `"format"` by callee text
    /// would also catch an unrelated `template.format(...)` method call on
    /// a project-defined object, which this isn't about.
    pub format_interpolation_sink: Option<SinkPattern>,
}

impl TaintConfig {
    /// The minimum recognizer set spec.md §4.5 names by example: request
    /// parameters, environment/process output and file reads as sources;
    /// SQL/command/template/path/deserialization/network sinks; the
    /// handful of conversions and escaping calls treated as sanitizers.
    pub fn default_config() -> Self {
        TaintConfig {
            sources: vec![
                src("request.args.get", TaintLevel::High),
                src("request.form.get", TaintLevel::High),
                src("request.json.get", TaintLevel::High),
                src("request.args", TaintLevel::High),
                src("request.form", TaintLevel::High),
                src("request.headers", TaintLevel::Medium),
                src("request.cookies", TaintLevel::Medium),
                src("os.environ", TaintLevel::Medium),
                src("os.environ.get", TaintLevel::Medium),
                src("sys.argv", TaintLevel::Medium),
                src("subprocess.check_output", TaintLevel::Medium),
                src("subprocess.run", TaintLevel::Medium),
                src("input", TaintLevel::High),
                src("open", TaintLevel::Low),
                src("socket.recv", TaintLevel::Medium),
                src("json.loads", TaintLevel::Medium),
                src("pickle.loads", TaintLevel::Critical),
            ],
            sinks: vec![
                sink("cursor.execute", SinkCategory::Sql, TaintLevel::Low, Some("CWE-89")),
                sink("cursor.executemany", SinkCategory::Sql, TaintLevel::Low, Some("CWE-89")),
                sink("connection.execute", SinkCategory::Sql, TaintLevel::Low, Some("CWE-89")),
                sink("os.system", SinkCategory::Command, TaintLevel::Low, Some("CWE-78")),
                sink("os.popen", SinkCategory::Command, TaintLevel::Low, Some("CWE-78")),
                sink("subprocess.call", SinkCategory::Command, TaintLevel::Low, Some("CWE-78")),
                sink("subprocess.Popen", SinkCategory::Command, TaintLevel::Low, Some("CWE-78")),
                sink("subprocess.run", SinkCategory::Command, TaintLevel::Low, Some("CWE-78")),
                sink("render_template_string", SinkCategory::Xss, TaintLevel::Low, Some("CWE-79")),
                sink("response.write", SinkCategory::Xss, TaintLevel::Low, Some("CWE-79")),
                sink("open", SinkCategory::Path, TaintLevel::Low, Some("CWE-22")),
                sink("os.path.join", SinkCategory::Path, TaintLevel::Low, Some("CWE-22")),
                sink("pickle.loads", SinkCategory::Deserialize, TaintLevel::Low, Some("CWE-502")),
                sink("yaml.load", SinkCategory::Deserialize, TaintLevel::Low, Some("CWE-502")),
                sink("requests.get", SinkCategory::Ssrf, TaintLevel::Low, Some("CWE-918")),
                sink("requests.post", SinkCategory::Ssrf, TaintLevel::Low, Some("CWE-918")),
                sink("urllib.request.urlopen", SinkCategory::Ssrf, TaintLevel::Low, Some("CWE-918")),
            ],
            sanitizers: vec![
                sanitizer("int", vec![SinkCategory::Sql, SinkCategory::Command, SinkCategory::Path]),
                sanitizer("float", vec![SinkCategory::Sql, SinkCategory::Command]),
                sanitizer("html.escape", vec![SinkCategory::Xss]),
                sanitizer("escape", vec![SinkCategory::Xss]),
                sanitizer("shlex.quote", vec![SinkCategory::Command]),
                sanitizer("os.path.basename", vec![SinkCategory::Path]),
                sanitizer("secure_filename", vec![SinkCategory::Path]),
            ],
            format_interpolation_sink: Some(sink("format", SinkCategory::Xss, TaintLevel::Low, Some("CWE-79"))),
        }
    }

    /// The format/template-intrinsic sink (see the field doc comment on
    /// [`TaintConfig::format_interpolation_sink`]): not matched by callee
    /// text, only by the caller already knowing the call carries
    /// `intrinsic = "format"`.
    pub fn classify_format_sink(&self) -> Option<(SinkCategory, TaintLevel, Option<&'static str>)> {
        self.format_interpolation_sink.as_ref().map(|p| (p.category, p.threshold, p.cwe))
    }

    pub fn classify_source(&self, callee: &str) -> Option<TaintLevel> {
        self.sources
            .iter()
            .filter(|p| callee == p.callee_contains || callee.ends_with(&format!(".{}", p.callee_contains)))
            .map(|p| p.level)
            .max()
    }

    pub fn classify_sink(&self, callee: &str) -> Option<(SinkCategory, TaintLevel, Option<&'static str>)> {
        self.sinks
            .iter()
            .find(|p| callee == p.callee_contains || callee.ends_with(&format!(".{}", p.callee_contains)))
            .map(|p| (p.category, p.threshold, p.cwe))
    }

    pub fn classify_sanitizer(&self, callee: &str) -> Option<Vec<SinkCategory>> {
        self.sanitizers
            .iter()
            .find(|p| callee == p.callee_contains || callee.ends_with(&format!(".{}", p.callee_contains)))
            .map(|p| p.clears.clone())
    }
}

fn src(callee_contains: &str, level: TaintLevel) -> SourcePattern {
    SourcePattern { callee_contains: callee_contains.to_string(), level }
}

fn sink(callee_contains: &str, category: SinkCategory, threshold: TaintLevel, cwe: Option<&'static str>) -> SinkPattern {
    SinkPattern { callee_contains: callee_contains.to_string(), category, threshold, cwe }
}

fn sanitizer(callee_contains: &str, clears: Vec<SinkCategory>) -> SanitizerPattern {
    SanitizerPattern { callee_contains: callee_contains.to_string(), clears }
}

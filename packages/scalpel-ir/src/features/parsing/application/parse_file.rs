//! Parse-one-file use case (spec.md §4.2).

use crate::errors::{Result, ScalpelError};
use crate::features::parsing::domain::ParsedModule;
use crate::features::parsing::ports::FrontendRegistry;

/// Dispatches `relative_path` to the frontend matching its extension and
/// lowers `source` into a [`ParsedModule`].
///
/// Returns `ScalpelError::Parse` if no registered frontend recognizes the
/// file's extension (spec.md §2: unsupported extensions are out of scope,
/// not an internal error, but the caller decides whether to skip or fail).
pub fn parse_file(registry: &FrontendRegistry, relative_path: &str, source: &str) -> Result<ParsedModule> {
    let frontend = registry
        .for_file(relative_path)
        .ok_or_else(|| ScalpelError::parse(format!("no frontend registered for '{relative_path}'")))?;
    let output = frontend.lower(source, relative_path)?;
    Ok(ParsedModule::new(frontend.language(), relative_path, output.root, output.diagnostics, output.imports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_python_by_extension() {
        let registry = crate::features::parsing::default_registry();
        let module = parse_file(&registry, "a.py", "def f():\n    pass\n").unwrap();
        assert_eq!(module.language, crate::shared::ports::Language::Python);
        assert!(!module.has_errors());
    }

    #[test]
    fn unknown_extension_is_a_parse_error() {
        let registry = crate::features::parsing::default_registry();
        let err = parse_file(&registry, "a.rs", "fn main() {}").unwrap_err();
        assert!(matches!(err, ScalpelError::Parse(_)));
    }
}

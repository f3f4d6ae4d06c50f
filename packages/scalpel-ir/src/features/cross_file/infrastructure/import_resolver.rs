//! Resolves an [`ImportStatement`]'s module path to a file already known to
//! the project index (spec.md §4.3: "Cross-module resolution consults the
//! import graph"). A module that does not resolve to a project file is an
//! external dependency — the reference stays unresolved rather than being
//! treated as an error (spec.md §2: unreadable/unknown constructs degrade
//! gracefully).

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::shared::ports::Language;

/// Collapses `./` and `../` segments without touching the filesystem —
/// project files are addressed by relative path string, not by `Path::canonicalize`.
fn normalize(path: &Path) -> String {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.last(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out.iter().collect::<PathBuf>().to_string_lossy().replace('\\', "/")
}

pub fn resolve_module(
    importer_file: &str,
    module: &str,
    language: Language,
    known_files: &HashSet<String>,
) -> Option<String> {
    match language {
        Language::Python => {
            let candidate = format!("{}.py", module.replace('.', "/"));
            if known_files.contains(&candidate) {
                return Some(candidate);
            }
            let package_init = format!("{}/__init__.py", module.replace('.', "/"));
            known_files.contains(&package_init).then_some(package_init)
        }
        Language::Java => {
            let candidate = format!("{}.java", module.replace('.', "/"));
            known_files.contains(&candidate).then_some(candidate)
        }
        Language::JavaScript | Language::TypeScript => {
            if !module.starts_with('.') {
                return None; // external package, resolved by a package manager we don't model
            }
            let dir = Path::new(importer_file).parent().unwrap_or_else(|| Path::new(""));
            let joined = dir.join(module);
            for suffix in ["", ".ts", ".tsx", ".js", ".jsx", "/index.ts", "/index.js"] {
                let candidate = normalize(&PathBuf::from(format!("{}{suffix}", joined.display())));
                if known_files.contains(&candidate) {
                    return Some(candidate);
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_python_dotted_module_to_its_file() {
        let mut known = HashSet::new();
        known.insert("pkg/utils.py".to_string());
        assert_eq!(
            resolve_module("pkg/main.py", "pkg.utils", Language::Python, &known),
            Some("pkg/utils.py".to_string())
        );
    }

    #[test]
    fn external_js_specifiers_are_not_resolved() {
        let known = HashSet::new();
        assert_eq!(resolve_module("a.js", "express", Language::JavaScript, &known), None);
    }

    #[test]
    fn relative_js_specifier_resolves_with_extension_inference() {
        let mut known = HashSet::new();
        known.insert("lib/helpers.ts".to_string());
        assert_eq!(
            resolve_module("lib/main.ts", "./helpers", Language::TypeScript, &known),
            Some("lib/helpers.ts".to_string())
        );
    }
}

//! Language Frontends (spec.md §4.2: C2) — lowers Python, JavaScript,
//! TypeScript, and Java source into the shared [`crate::shared::ir`] model.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::parse_file;
pub use domain::ParsedModule;
pub use ports::{FrontendOutput, FrontendRegistry, LanguageFrontend};

/// The registry wired for every language spec.md §2 lists as supported.
/// Lives here, not in `ports`, so the port stays free of any concrete
/// frontend dependency.
pub fn default_registry() -> FrontendRegistry {
    let mut registry = FrontendRegistry::new();
    registry.register(Box::new(infrastructure::frontends::python::PythonFrontend));
    registry.register(Box::new(infrastructure::frontends::javascript::JavaScriptFrontend));
    registry.register(Box::new(infrastructure::frontends::typescript::TypeScriptFrontend));
    registry.register(Box::new(infrastructure::frontends::java::JavaFrontend));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_dispatches_every_supported_extension() {
        let registry = default_registry();
        assert!(registry.for_file("a.py").is_some());
        assert!(registry.for_file("a.ts").is_some());
        assert!(registry.for_file("a.js").is_some());
        assert!(registry.for_file("a.java").is_some());
        assert!(registry.for_file("a.rs").is_none());
    }
}

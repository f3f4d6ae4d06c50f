//! Language abstraction

/// Languages recognized by the frontends (spec.md §6 extension table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::JavaScript => &["js", "mjs", "jsx"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Java => &["java"],
        }
    }

    /// `None` means the extension is unrecognized — the caller should skip
    /// the file silently rather than treat it as an error (spec.md §6).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" | "mjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    pub fn from_file_path(path: &str) -> Option<Self> {
        path.rsplit('.').next().and_then(Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_extension_recognizes_all_four_languages() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("jsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("java"), Some(Language::Java));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn from_file_path_uses_the_final_extension() {
        assert_eq!(
            Language::from_file_path("src/main.py"),
            Some(Language::Python)
        );
        assert_eq!(
            Language::from_file_path("app.component.tsx"),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_file_path("README"), None);
    }
}

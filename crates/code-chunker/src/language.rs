use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Parser grammar a file is read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl Grammar {
    /// Grammar identifier as it appears in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    /// Language recorded on chunks (JSX and TSX are dialects, not languages)
    #[must_use]
    pub const fn language_name(self) -> &'static str {
        match self {
            Self::JavaScript | Self::Jsx => "javascript",
            Self::TypeScript | Self::Tsx => "typescript",
        }
    }

    /// Get Tree-sitter language instance
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            // The JavaScript grammar parses JSX natively.
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Default extension table
    #[must_use]
    pub fn default_extensions() -> BTreeMap<String, Grammar> {
        [
            (".js", Self::JavaScript),
            (".jsx", Self::Jsx),
            (".ts", Self::TypeScript),
            (".tsx", Self::Tsx),
        ]
        .into_iter()
        .map(|(ext, grammar)| (ext.to_string(), grammar))
        .collect()
    }
}

/// Maps file extensions onto grammars using a configurable table
#[derive(Debug, Clone)]
pub struct GrammarResolver {
    extensions: BTreeMap<String, Grammar>,
}

impl GrammarResolver {
    pub fn new(extensions: BTreeMap<String, Grammar>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|(ext, grammar)| (normalize_extension(&ext), grammar))
            .collect();
        Self { extensions }
    }

    /// Resolve an extension such as `.TS` or `tsx`
    #[must_use]
    pub fn resolve_extension(&self, ext: &str) -> Option<Grammar> {
        self.extensions.get(&normalize_extension(ext)).copied()
    }

    /// Resolve the grammar for a file path, `None` when unsupported
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Option<Grammar> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.resolve_extension(ext))
    }

    /// Configured extensions in sorted order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }
}

impl Default for GrammarResolver {
    fn default() -> Self {
        Self::new(Grammar::default_extensions())
    }
}

fn normalize_extension(ext: &str) -> String {
    let lowered = ext.trim().to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}

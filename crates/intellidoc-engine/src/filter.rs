use std::path::Path;

/// Tokens excluded unless the caller supplies its own list.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".git",
    ".venv",
    "node_modules",
    "__pycache__",
    ".DS_Store",
    "pb_data",
    "pb_public",
    "migrations",
];

/// Decides whether a path is out of scope.
///
/// A path is excluded when any token occurs as a substring of its string
/// form, not only when a whole path segment matches: `my_migrations_notes.txt`
/// is excluded by `migrations`.
#[derive(Clone, Debug)]
pub struct ExclusionFilter {
    tokens: Vec<String>,
}

impl ExclusionFilter {
    /// Empty tokens are dropped; they would match every path.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_EXCLUSIONS.iter().copied())
    }

    /// Add tokens on top of the current set, skipping duplicates.
    pub fn extend<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in extra.into_iter().map(Into::into) {
            if !token.is_empty() && !self.tokens.contains(&token) {
                self.tokens.push(token);
            }
        }
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.is_excluded_str(&path.to_string_lossy())
    }

    pub fn is_excluded_str(&self, path: &str) -> bool {
        self.tokens.iter().any(|t| path.contains(t.as_str()))
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_vcs_and_dependency_dirs() {
        let f = ExclusionFilter::default();
        assert!(f.is_excluded(Path::new(".git")));
        assert!(f.is_excluded(Path::new("src/.git/config")));
        assert!(f.is_excluded(Path::new("web/node_modules/react/index.js")));
        assert!(f.is_excluded(Path::new("pkg/__pycache__/mod.pyc")));
        assert!(!f.is_excluded(Path::new("src/main.rs")));
    }

    #[test]
    fn substring_not_segment_semantics() {
        let f = ExclusionFilter::default();
        assert!(f.is_excluded(Path::new("docs/my_migrations_notes.txt")));
        assert!(f.is_excluded(Path::new("cmd/migrations.go")));
        assert!(f.is_excluded(Path::new(".gitignore")));
        assert!(f.is_excluded(Path::new(".github/workflows/ci.yml")));
    }

    #[test]
    fn token_is_substring_iff_excluded() {
        let f = ExclusionFilter::new(["abc", "xyz"]);
        for (path, expected) in [
            ("abc", true),
            ("zabcz", true),
            ("a/b/c", false),
            ("dir/xyz.txt", true),
            ("xy/z", false),
            ("", false),
        ] {
            assert_eq!(f.is_excluded_str(path), expected, "path {path:?}");
        }
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let f = ExclusionFilter::new(["", "target"]);
        assert_eq!(f.tokens(), ["target".to_string()]);
        assert!(!f.is_excluded(Path::new("src/lib.rs")));
    }

    #[test]
    fn extend_adds_unique_tokens() {
        let f = ExclusionFilter::new(["a"]).extend(["b", "a", ""]);
        assert_eq!(f.tokens(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn no_tokens_excludes_nothing() {
        let f = ExclusionFilter::new(Vec::<String>::new());
        assert!(!f.is_excluded(Path::new(".git/HEAD")));
    }
}

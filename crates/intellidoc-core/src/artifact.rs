use std::fmt;

/// One generated summary and the level it was produced at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Root,
    File(String),
    Directory(String),
}

impl ArtifactKind {
    /// Heading written in front of the artifact in the summary log.
    pub fn label(&self) -> String {
        match self {
            Self::Root => "Project Overview".to_string(),
            Self::File(path) => format!("File: {path}"),
            Self::Directory(path) => format!("Directory: {path}"),
        }
    }

    /// Key path into the findings document.
    pub fn store_keys(&self) -> Vec<&str> {
        match self {
            Self::Root => vec!["root_summary"],
            Self::File(path) => vec!["files", path.as_str()],
            Self::Directory(path) => vec!["directories", path.as_str()],
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format of a run stamp, e.g. `20250114_093005`.
pub const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Key under which the project root itself is stored.
pub const ROOT_DIRECTORY_KEY: &str = ".";

/// Identity of one invocation: its creation timestamp, rendered as a stamp.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    pub fn at(time: DateTime<Local>) -> Self {
        Self(time.format(RUN_STAMP_FORMAT).to_string())
    }

    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a component needs to know about the current run.
///
/// Passed explicitly to the store, walker and guide builder; nothing reads
/// the run stamp from ambient state.
#[derive(Clone, Debug)]
pub struct RunContext {
    pub run_id: RunId,
    pub project_root: PathBuf,
    pub output_root: PathBuf,
}

impl RunContext {
    pub fn new(
        run_id: RunId,
        project_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            run_id,
            project_root: project_root.into(),
            output_root: output_root.into(),
        }
    }

    /// `<output>/findings`, shared by all runs.
    pub fn findings_root(&self) -> PathBuf {
        self.output_root.join("findings")
    }

    /// `<output>/findings/<stamp>`; every artifact of the run lives here.
    pub fn run_dir(&self) -> PathBuf {
        self.findings_root().join(self.run_id.as_str())
    }

    /// Whether `path` is the artifact directory of this or an earlier run:
    /// a stamp-named child of [`findings_root`](Self::findings_root) holding
    /// a `findings.json`.
    pub fn is_run_dir(&self, path: &Path) -> bool {
        if path == self.run_dir() {
            return true;
        }
        if path.parent() != Some(self.findings_root().as_path()) {
            return false;
        }
        let is_stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| NaiveDateTime::parse_from_str(n, RUN_STAMP_FORMAT).is_ok());
        is_stamp && path.join("findings.json").is_file()
    }

    pub fn findings_path(&self) -> PathBuf {
        self.run_dir().join("findings.json")
    }

    pub fn summaries_path(&self) -> PathBuf {
        self.run_dir()
            .join(format!("initial-summaries_{}.txt", self.run_id))
    }

    pub fn guide_path(&self) -> PathBuf {
        self.run_dir().join(format!("guidebook_{}.md", self.run_id))
    }

    /// Project-relative key for `path` in forward-slash form.
    ///
    /// Returns `"."` for the root itself and `None` for paths outside the
    /// project.
    pub fn relative_key(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.project_root).ok()?;
        Some(normalize_key(rel))
    }
}

/// Render a relative path with `/` separators regardless of platform.
pub fn normalize_key(rel: &Path) -> String {
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        ROOT_DIRECTORY_KEY.to_string()
    } else {
        parts.join("/")
    }
}

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use intellidoc_core::ArtifactKind;

use crate::error::StoreError;

/// Append-only, human-readable transcript of every artifact in a run.
pub struct SummaryLog {
    path: PathBuf,
}

impl SummaryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `block` plus a blank-line separator and sync before returning.
    pub fn append(&self, block: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(format!("{block}\n\n").as_bytes())
            .map_err(io_err)?;
        file.sync_data().map_err(io_err)
    }

    /// Append `"<label>:\n<summary>"` for one artifact.
    pub fn append_artifact(&self, kind: &ArtifactKind, summary: &str) -> Result<(), StoreError> {
        self.append(&format!("{}:\n{}", kind.label(), summary))
    }

    pub fn read_to_string(&self) -> Result<String, StoreError> {
        fs::read_to_string(&self.path).map_err(|e| StoreError::from_io(&self.path, e))
    }
}

use std::path::PathBuf;

use intellidoc_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(StoreError),

    #[error("required artifact is missing: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingArtifact(path) => EngineError::MissingArtifact(path),
            other => EngineError::Store(other),
        }
    }
}

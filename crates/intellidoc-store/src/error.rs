use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing artifact: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("invalid key path: {0}")]
    InvalidKey(String),
}

impl StoreError {
    /// Map an IO error, turning `NotFound` into [`StoreError::MissingArtifact`].
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::MissingArtifact(path.to_owned())
        } else {
            StoreError::Io {
                path: path.to_owned(),
                source,
            }
        }
    }
}

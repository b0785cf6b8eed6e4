use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Enumeration failed; the whole batch is aborted
    #[error("IO error at {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] repochunk_chunker::ChunkerError),

    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl IndexerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Path named by the error, if any
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::IoError { path, .. } => Some(path),
            _ => None,
        }
    }
}

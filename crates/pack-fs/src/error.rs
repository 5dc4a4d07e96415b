//! Error types for pack-fs

use std::path::PathBuf;

use crate::tree::TreePhase;

/// Result type for pack-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} document at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} document for {path}: {message}")]
    Serialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Path {path} escapes its root {root}")]
    PathTraversal { path: String, root: String },

    #[error("Failed to {phase} target tree {path}: {source}")]
    TreeReplace {
        path: PathBuf,
        phase: TreePhase,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Error types for pack-codec

use std::path::PathBuf;

/// Result type for pack-codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a single pack
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error from pack-fs
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pack source not found at {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Malformed record in {path} at line {line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Record in {path} is not an object")]
    NotAnObject { path: PathBuf },

    #[error("Record in {path} has no string _id")]
    MissingId { path: PathBuf },

    #[error("Record id '{id}' in {path} cannot be used as a file name: {message}")]
    UnsafeId {
        path: PathBuf,
        id: String,
        message: String,
    },

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

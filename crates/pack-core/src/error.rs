//! Error types for pack-core

use std::path::PathBuf;

/// Result type for pack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid run configuration detected before anything was touched
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Manifest missing or not well-formed
    #[error("Cannot read manifest at {path}: {reason}")]
    ManifestUnreadable { path: PathBuf, reason: String },

    /// Conversion source root does not exist or is not a directory
    #[error("Source directory {path} doesn't exist")]
    SourceMissing { path: PathBuf },

    /// Conversion source root has no entries
    #[error("Source directory {path} doesn't contain any files")]
    SourceEmpty { path: PathBuf },

    /// Two descriptors share a pack name
    #[error("Pack name '{name}' appears more than once in the manifest")]
    DuplicatePack { name: String },

    /// Pack name or path would resolve outside its root
    #[error("Pack '{name}' rejected: {message}")]
    PathTraversal { name: String, message: String },

    /// Descriptor has no document type
    #[error("Pack '{name}' has no document type")]
    MissingDocumentType { name: String },

    /// Descriptor names a document type the codec does not know
    #[error("Pack '{name}' has unknown document type '{value}'")]
    UnknownDocumentType { name: String, value: String },

    /// Descriptor has no path to read its data form from
    #[error("Pack '{name}' has no path")]
    MissingPackPath { name: String },

    /// Legacy entry could not be matched against the module descriptor
    #[error("Couldn't identify document type for {entry}")]
    UnidentifiedPack { entry: String },

    /// Legacy entry is not an embedded database file
    #[error("Won't attempt to convert non-NEDB file {entry}")]
    NotLegacyFile { entry: String },

    /// Target tree removal or creation failed
    #[error("Failed to replace target tree {path}; it may be left incomplete: {source}")]
    DestructiveStep {
        path: PathBuf,
        #[source]
        source: pack_fs::Error,
    },

    /// Manifest could not be written after packs were converted
    #[error("Failed to write manifest {path}; target tree is converted but the manifest is stale: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: pack_fs::Error,
    },

    /// Confirmation prompt could not be shown
    #[error("Confirmation prompt failed: {message}")]
    Prompt { message: String },

    // Transparent wrapper for the filesystem layer
    /// Filesystem error from pack-fs
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),
}

impl Error {
    /// Whether this error is raised before any destructive step.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::ManifestUnreadable { .. }
                | Self::SourceMissing { .. }
                | Self::SourceEmpty { .. }
                | Self::DuplicatePack { .. }
                | Self::PathTraversal { .. }
        )
    }

    /// Whether this error leaves the target tree in an incomplete state.
    pub fn leaves_target_dirty(&self) -> bool {
        matches!(self, Self::DestructiveStep { .. } | Self::ManifestWrite { .. })
    }

    /// Whether a per-pack resolution error means "skip this pack".
    pub(crate) fn is_pack_skip(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. }
                | Self::MissingDocumentType { .. }
                | Self::UnknownDocumentType { .. }
                | Self::MissingPackPath { .. }
                | Self::UnidentifiedPack { .. }
                | Self::NotLegacyFile { .. }
        )
    }
}

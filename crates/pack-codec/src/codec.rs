//! The codec seam used by the sync engine

use pack_fs::NormalizedPath;

use crate::{DocumentType, Result};

/// Per-pack options passed to a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// How records in this pack are interpreted and keyed
    pub document_type: DocumentType,
    /// Read the data form as a legacy single-file embedded database
    pub legacy_format: bool,
}

impl CodecOptions {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            legacy_format: false,
        }
    }

    pub fn legacy(mut self, legacy_format: bool) -> Self {
        self.legacy_format = legacy_format;
        self
    }
}

/// Converts a whole pack between data form and source form.
///
/// Implementations write only inside `target`, which the caller has already
/// created. Both operations return the number of records converted.
pub trait PackCodec: Send + Sync {
    /// Read the data form at `source` and write one source file per record
    /// under `target`.
    fn extract(
        &self,
        source: &NormalizedPath,
        target: &NormalizedPath,
        options: &CodecOptions,
    ) -> Result<usize>;

    /// Read every source file under `source` (recursively) and write the
    /// data form into `target`.
    fn compile(
        &self,
        source: &NormalizedPath,
        target: &NormalizedPath,
        options: &CodecOptions,
    ) -> Result<usize>;
}

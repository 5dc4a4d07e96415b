//! Path resolution for pack descriptors
//!
//! Manifest text is author-controlled, so every name and path is checked to
//! stay inside its root before anything is read or written.

use pack_codec::DocumentType;
use pack_fs::{NormalizedPath, PackPath, resolve_within, validate_path_identifier};
use tracing::debug;

use crate::manifest::{Manifest, PackDescriptor};
use crate::sync::{Direction, PackSource};
use crate::{Error, Result};

/// Where one pack is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPack {
    pub name: String,
    pub document_type: DocumentType,
    pub source: NormalizedPath,
    pub target: NormalizedPath,
    /// Path to persist in the manifest once converted, if any
    pub manifest_path: Option<String>,
}

/// Canonical manifest path of a converted pack: `./packs/<name>`.
pub fn canonical_pack_path(name: &str) -> String {
    format!("./{}/{}", PackPath::PacksDir, name)
}

/// Resolves descriptors to physical paths for one direction.
#[derive(Debug, Clone)]
pub struct PathResolver {
    direction: Direction,
    source_root: NormalizedPath,
    target_root: NormalizedPath,
    manifest_dir: NormalizedPath,
}

impl PathResolver {
    /// `source_root`/`target_root` are the conversion roots for `direction`;
    /// `manifest_dir` is the directory holding the manifest that was read.
    pub fn new(
        direction: Direction,
        source_root: NormalizedPath,
        target_root: NormalizedPath,
        manifest_dir: NormalizedPath,
    ) -> Self {
        Self {
            direction,
            source_root,
            target_root,
            manifest_dir,
        }
    }

    /// Resolve a manifest descriptor.
    ///
    /// # Errors
    ///
    /// [`Error::PathTraversal`] when the name is not a single safe path
    /// component, the manifest path leaves the manifest directory, or it
    /// overlaps the target root;
    /// [`Error::MissingDocumentType`] / [`Error::UnknownDocumentType`] when
    /// the type tag does not resolve; [`Error::MissingPackPath`] when
    /// extracting a descriptor without a `path`.
    pub fn resolve(&self, pack: &PackDescriptor) -> Result<ResolvedPack> {
        let name = pack.name();
        check_name(name)?;
        let document_type = pack.resolve_document_type()?;

        let source = match self.direction.rules().pack_source {
            PackSource::ManifestPath => {
                let relative = pack
                    .path()
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| Error::MissingPackPath {
                        name: name.to_string(),
                    })?;
                let source =
                    resolve_within(&self.manifest_dir, relative).map_err(|e| Error::PathTraversal {
                        name: name.to_string(),
                        message: e.to_string(),
                    })?;
                // The target root is emptied before conversion starts
                if source.starts_with(&self.target_root) || self.target_root.starts_with(&source) {
                    return Err(Error::PathTraversal {
                        name: name.to_string(),
                        message: format!(
                            "path {} overlaps target root {}",
                            source, self.target_root
                        ),
                    });
                }
                source
            }
            PackSource::NamedSubdirectory | PackSource::RootEntries => self.source_root.join(name),
        };

        let resolved = ResolvedPack {
            name: name.to_string(),
            document_type,
            source,
            target: self.target_root.join(name),
            manifest_path: self
                .direction
                .rules()
                .rewrites_manifest
                .then(|| canonical_pack_path(name)),
        };
        debug!(pack = name, source = %resolved.source, target = %resolved.target, "Resolved pack");
        Ok(resolved)
    }

    /// Resolve an entry found directly under the legacy data root.
    ///
    /// With `nedb`, only `<name>.db` files are packs and the extension is
    /// stripped for the target directory. The document type comes from the
    /// first descriptor in `module` whose path ends in `entry`.
    pub fn resolve_legacy(&self, entry: &str, module: &Manifest, nedb: bool) -> Result<ResolvedPack> {
        let name = if nedb {
            let suffix = format!(".{}", PackPath::LegacyExtension);
            match entry.strip_suffix(&suffix) {
                Some(stem) if !stem.is_empty() => stem,
                _ => {
                    return Err(Error::NotLegacyFile {
                        entry: entry.to_string(),
                    });
                }
            }
        } else {
            entry
        };
        check_name(entry)?;
        check_name(name)?;

        let descriptor = module
            .find_by_file_name(entry)
            .ok_or_else(|| Error::UnidentifiedPack {
                entry: entry.to_string(),
            })?;
        let document_type = descriptor.document_type().ok_or_else(|| Error::UnidentifiedPack {
            entry: entry.to_string(),
        })?;
        let document_type = document_type.parse().map_err(|_| Error::UnknownDocumentType {
            name: entry.to_string(),
            value: document_type.to_string(),
        })?;

        let resolved = ResolvedPack {
            name: name.to_string(),
            document_type,
            source: self.source_root.join(entry),
            target: self.target_root.join(name),
            manifest_path: None,
        };
        debug!(entry, source = %resolved.source, target = %resolved.target, "Resolved legacy pack");
        Ok(resolved)
    }
}

fn check_name(name: &str) -> Result<()> {
    validate_path_identifier(name, "Pack name").map_err(|message| Error::PathTraversal {
        name: name.to_string(),
        message,
    })
}

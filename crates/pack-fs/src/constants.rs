//! Constants for the conventional module layout.

use std::path::Path;

/// Standard names in a module's directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackPath {
    /// The `packs` directory holding data-form packs
    PacksDir,
    /// The `src` directory whose `packs` child holds source-form packs
    SourceDir,
    /// The `module.json` manifest, one level above a pack root
    ManifestFile,
    /// Extension of legacy single-file embedded databases
    LegacyExtension,
}

impl PackPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PacksDir => "packs",
            Self::SourceDir => "src",
            Self::ManifestFile => "module.json",
            Self::LegacyExtension => "db",
        }
    }
}

impl AsRef<Path> for PackPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PackPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PackPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

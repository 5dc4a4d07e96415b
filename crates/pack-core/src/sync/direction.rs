//! Direction-specific rules for the sync engine

use pack_fs::NormalizedPath;

/// Which way a sync run converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Data form to source form, driven by the manifest
    Extract,
    /// Source form to data form, driven by the manifest
    Compile,
    /// Data form to source form, driven by the entries of the data root
    ExtractLegacy,
}

/// Codec operation a direction drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOperation {
    Extract,
    Compile,
}

/// Where a run reads its conversion input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSource {
    /// Each descriptor's manifest-relative `path`
    ManifestPath,
    /// `<source root>/<name>`
    NamedSubdirectory,
    /// Every entry found directly under the source root
    RootEntries,
}

/// The table of everything that differs between directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRules {
    pub operation: CodecOperation,
    pub pack_source: PackSource,
    /// Read the conversion input from the data root (else the source root)
    pub reads_data_root: bool,
    /// Rewrite descriptor paths and persist the manifest beside the target
    pub rewrites_manifest: bool,
    /// Verb for progress logs
    pub verb: &'static str,
}

impl Direction {
    pub const fn rules(self) -> DirectionRules {
        match self {
            Self::Extract => DirectionRules {
                operation: CodecOperation::Extract,
                pack_source: PackSource::ManifestPath,
                reads_data_root: true,
                rewrites_manifest: true,
                verb: "Extracting",
            },
            Self::Compile => DirectionRules {
                operation: CodecOperation::Compile,
                pack_source: PackSource::NamedSubdirectory,
                reads_data_root: false,
                rewrites_manifest: true,
                verb: "Compiling",
            },
            Self::ExtractLegacy => DirectionRules {
                operation: CodecOperation::Extract,
                pack_source: PackSource::RootEntries,
                reads_data_root: true,
                rewrites_manifest: false,
                verb: "Extracting",
            },
        }
    }

    /// Split the two roots into (conversion source, conversion target).
    pub fn roots<'a>(
        self,
        data_root: &'a NormalizedPath,
        source_root: &'a NormalizedPath,
    ) -> (&'a NormalizedPath, &'a NormalizedPath) {
        if self.rules().reads_data_root {
            (data_root, source_root)
        } else {
            (source_root, data_root)
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Compile => write!(f, "compile"),
            Self::ExtractLegacy => write!(f, "extract-legacy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_and_compile_swap_roots() {
        let data = NormalizedPath::new("/m/packs");
        let source = NormalizedPath::new("/m/src/packs");

        assert_eq!(Direction::Extract.roots(&data, &source), (&data, &source));
        assert_eq!(Direction::Compile.roots(&data, &source), (&source, &data));
        assert_eq!(Direction::ExtractLegacy.roots(&data, &source), (&data, &source));
    }

    #[test]
    fn only_legacy_skips_manifest_rewrite() {
        assert!(Direction::Extract.rules().rewrites_manifest);
        assert!(Direction::Compile.rules().rewrites_manifest);
        assert!(!Direction::ExtractLegacy.rules().rewrites_manifest);
    }
}

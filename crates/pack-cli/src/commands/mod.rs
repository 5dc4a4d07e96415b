//! Command implementations for pack-cli

pub mod sync;

use std::path::{Path, PathBuf};

pub use sync::{run_compile, run_extract, run_extract_legacy};

/// Settings shared by every command, from the global flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Absolute base for relative directory flags
    pub package_root: PathBuf,
    pub jobs: u16,
    pub strict: bool,
}

impl RunSettings {
    /// Resolve a directory flag, falling back to `default` under the package root.
    pub fn dir(&self, flag: Option<&Path>, default: &str) -> PathBuf {
        absolutize(&self.package_root, flag.unwrap_or(Path::new(default)))
    }
}

/// Join `path` onto `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

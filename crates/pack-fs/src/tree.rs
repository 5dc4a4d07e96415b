//! Two-phase target tree replacement
//!
//! A sync run owns its target root outright: whatever was there is removed
//! and an empty directory takes its place before any pack is written. The
//! removal is checked for completion before the create phase starts, so a
//! caller never writes into a half-deleted tree.

use std::fs;
use std::io::ErrorKind;

use tracing::{debug, info};

use crate::{Error, NormalizedPath, Result, RobustnessConfig};

/// Phase of a tree replacement, reported in failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePhase {
    Remove,
    Create,
}

impl std::fmt::Display for TreePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove => write!(f, "remove"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Replace `target` with a fresh, empty directory using the default policy.
pub fn replace_tree(target: &NormalizedPath) -> Result<()> {
    TreeReplacer::default().replace(target)
}

/// Removes and recreates directory trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeReplacer {
    robustness: RobustnessConfig,
}

impl TreeReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: RobustnessConfig) -> Self {
        Self { robustness }
    }

    /// Remove `target` if present, then create it empty.
    ///
    /// Calling this on a path that does not exist only creates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TreeReplace`] naming the failed phase. After a
    /// remove failure the target may be partially deleted.
    pub fn replace(&self, target: &NormalizedPath) -> Result<()> {
        self.remove(target)?;
        self.create(target)
    }

    fn remove(&self, target: &NormalizedPath) -> Result<()> {
        let native = target.to_native();
        let fail = |source| Error::TreeReplace {
            path: native.clone(),
            phase: TreePhase::Remove,
            source,
        };

        let metadata = match fs::symlink_metadata(&native) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %target, "Target does not exist, nothing to delete");
                return Ok(());
            }
            Err(e) => return Err(fail(e)),
        };

        info!("Deleting target {}", target);
        // Symlinks are unlinked, never followed
        let remove_once = || {
            let outcome = if metadata.is_dir() {
                fs::remove_dir_all(&native)
            } else {
                fs::remove_file(&native)
            };
            match outcome {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                    Err(backoff::Error::permanent(e))
                }
                Err(e) => Err(backoff::Error::transient(e)),
            }
        };
        backoff::retry(self.robustness.backoff(), remove_once).map_err(|e| match e {
            backoff::Error::Permanent(err) | backoff::Error::Transient { err, .. } => fail(err),
        })?;

        match fs::symlink_metadata(&native) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(fail(e)),
            Ok(_) => Err(fail(std::io::Error::other(
                "target still present after removal",
            ))),
        }
    }

    fn create(&self, target: &NormalizedPath) -> Result<()> {
        let native = target.to_native();
        let fail = |source| Error::TreeReplace {
            path: native.clone(),
            phase: TreePhase::Create,
            source,
        };

        info!("(Re)creating target {}", target);
        fs::create_dir_all(&native).map_err(fail)?;

        let mut entries = fs::read_dir(&native).map_err(fail)?;
        if entries.next().is_some() {
            return Err(fail(std::io::Error::other(
                "target is not empty after creation",
            )));
        }
        Ok(())
    }
}

//! Core orchestration layer for pack sync
//!
//! This crate converts a module's packs between data form and source form,
//! driven by the module manifest:
//!
//! - **Manifest model**: order-preserving read/modify/write of `module.json`
//! - **Path resolution**: descriptor to physical paths, contained to their roots
//! - **SyncEngine**: confirm, validate, replace the target tree, convert each
//!   pack, rewrite pack paths and persist the manifest
//!
//! # Architecture
//!
//! ```text
//!        pack-cli
//!           |
//!       pack-core
//!        /     \
//!  pack-codec   |
//!        \     /
//!        pack-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pack_core::{AssumeYes, Direction, SyncEngine, SyncOptions};
//! use pack_fs::NormalizedPath;
//!
//! let engine = SyncEngine::new(
//!     Direction::Extract,
//!     NormalizedPath::new("/module/packs"),
//!     NormalizedPath::new("/module/src/packs"),
//!     SyncOptions::default(),
//! );
//! let outcome = engine.run(&AssumeYes).unwrap();
//! ```

pub mod confirm;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod sync;

pub use confirm::{AssumeYes, Confirm, Decline};
pub use error::{Error, Result};
pub use manifest::{Manifest, PackDescriptor};
pub use resolver::{PathResolver, ResolvedPack, canonical_pack_path};
pub use sync::{
    Direction, DirectionRules, PackOutcome, PackReport, SyncEngine, SyncOptions, SyncOutcome,
    SyncReport, SyncState,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn manifest_unreadable_displays_path() {
        let error = Error::ManifestUnreadable {
            path: PathBuf::from("/module/module.json"),
            reason: "missing".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("/module/module.json"), "got: {}", display);
        assert!(error.is_configuration());
        assert!(!error.leaves_target_dirty());
    }

    #[test]
    fn destructive_step_reports_dirty_target() {
        let error = Error::DestructiveStep {
            path: PathBuf::from("/module/src/packs"),
            source: pack_fs::Error::LockFailed {
                path: PathBuf::from("/module/src/packs"),
            },
        };

        assert!(error.leaves_target_dirty());
        assert!(!error.is_configuration());
        assert!(format!("{}", error).contains("incomplete"));
    }
}

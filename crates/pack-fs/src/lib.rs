//! Filesystem layer for pack sync
//!
//! Provides normalized path handling, root-contained path resolution,
//! atomic I/O, a format-aware document store and the two-phase tree replacer.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod store;
pub mod tree;

pub use constants::PackPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, resolve_within, validate_path_identifier};
pub use store::DocumentStore;
pub use tree::{TreePhase, TreeReplacer, replace_tree};

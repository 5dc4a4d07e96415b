//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pack Sync - convert module packs between data form and source form
#[derive(Parser, Debug)]
#[command(name = "packs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of packs converted in parallel
    #[arg(long, global = true, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Fail the run when any pack is skipped
    #[arg(long, global = true)]
    pub strict: bool,

    /// Base directory for relative pack directories (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Extract packs from the root's entries, typing them by file name
    ///
    /// The module manifest one level above the source directory is used to
    /// look up each pack's document type. No manifest is written.
    ///
    /// Examples:
    ///   packs extract-legacy --nedb        # packs/*.db -> src/packs/*
    ///   packs extract-legacy -y            # packs/* directories, no prompt
    ExtractLegacy {
        /// Directory holding the legacy packs [default: packs]
        #[arg(long, value_name = "DIR", env = "PACKS_DATA_DIR")]
        source_dir: Option<PathBuf>,

        /// Directory to write source packs into [default: src/packs]
        #[arg(long, value_name = "DIR", env = "PACKS_SOURCE_DIR")]
        target_dir: Option<PathBuf>,

        /// Packs are single-file embedded databases (`<name>.db`)
        #[arg(long)]
        nedb: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Extract every pack listed in the module manifest into source form
    ///
    /// Reads `<data-dir>/../module.json` and writes the rewritten manifest to
    /// `<source-dir>/../module.json`.
    Extract {
        /// Directory holding compiled packs [default: packs]
        #[arg(long, value_name = "DIR", env = "PACKS_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Directory to write source packs into [default: src/packs]
        #[arg(long, value_name = "DIR", env = "PACKS_SOURCE_DIR")]
        source_dir: Option<PathBuf>,

        /// Packs are single-file embedded databases (`<name>.db`)
        #[arg(long)]
        nedb: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Compile every pack listed in the source manifest into data form
    ///
    /// Reads `<source-dir>/../module.json` and writes the rewritten manifest
    /// to `<data-dir>/../module.json`.
    Compile {
        /// Directory to write compiled packs into [default: packs]
        #[arg(long, value_name = "DIR", env = "PACKS_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Directory holding source packs [default: src/packs]
        #[arg(long, value_name = "DIR", env = "PACKS_SOURCE_DIR")]
        source_dir: Option<PathBuf>,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

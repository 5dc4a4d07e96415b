//! Pack Sync CLI
//!
//! Converts a module's packs between their compiled data form and a
//! reviewable source tree.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::RunSettings;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    let package_root = match cli.package_root {
        Some(root) => commands::absolutize(&std::env::current_dir()?, &root),
        None => std::env::current_dir()?,
    };
    let settings = RunSettings {
        package_root,
        jobs: cli.jobs,
        strict: cli.strict,
    };

    match cli.command {
        Commands::ExtractLegacy {
            source_dir,
            target_dir,
            nedb,
            yes,
        } => commands::run_extract_legacy(&settings, source_dir.as_deref(), target_dir.as_deref(), nedb, yes),
        Commands::Extract {
            data_dir,
            source_dir,
            nedb,
            yes,
        } => commands::run_extract(&settings, data_dir.as_deref(), source_dir.as_deref(), nedb, yes),
        Commands::Compile {
            data_dir,
            source_dir,
            yes,
        } => commands::run_compile(&settings, data_dir.as_deref(), source_dir.as_deref(), yes),
    }
}

//! Extract, compile and legacy extraction commands
//!
//! Each command builds a [`SyncEngine`] for its direction, runs it behind a
//! dialoguer confirmation and prints a per-pack summary.

use std::path::Path;

use colored::Colorize;

use pack_core::{
    AssumeYes, Confirm, Direction, PackOutcome, SyncEngine, SyncOptions, SyncOutcome, SyncReport,
};
use pack_fs::{NormalizedPath, PackPath};

use super::RunSettings;
use crate::error::{CliError, Result};
use crate::interactive::DialoguerConfirm;

/// `src/packs`
fn default_source_dir() -> String {
    format!("{}/{}", PackPath::SourceDir, PackPath::PacksDir)
}

/// Run the extract-legacy command
///
/// `source_dir` holds the legacy packs, `target_dir` receives source packs.
pub fn run_extract_legacy(
    settings: &RunSettings,
    source_dir: Option<&Path>,
    target_dir: Option<&Path>,
    nedb: bool,
    yes: bool,
) -> Result<()> {
    let data_root = settings.dir(source_dir, PackPath::PacksDir.as_str());
    let source_root = settings.dir(target_dir, &default_source_dir());
    run_direction(settings, Direction::ExtractLegacy, &data_root, &source_root, nedb, yes)
}

/// Run the extract command
pub fn run_extract(
    settings: &RunSettings,
    data_dir: Option<&Path>,
    source_dir: Option<&Path>,
    nedb: bool,
    yes: bool,
) -> Result<()> {
    let data_root = settings.dir(data_dir, PackPath::PacksDir.as_str());
    let source_root = settings.dir(source_dir, &default_source_dir());
    run_direction(settings, Direction::Extract, &data_root, &source_root, nedb, yes)
}

/// Run the compile command
pub fn run_compile(
    settings: &RunSettings,
    data_dir: Option<&Path>,
    source_dir: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let data_root = settings.dir(data_dir, PackPath::PacksDir.as_str());
    let source_root = settings.dir(source_dir, &default_source_dir());
    run_direction(settings, Direction::Compile, &data_root, &source_root, false, yes)
}

fn run_direction(
    settings: &RunSettings,
    direction: Direction,
    data_root: &Path,
    source_root: &Path,
    nedb: bool,
    yes: bool,
) -> Result<()> {
    let options = SyncOptions {
        assume_yes: yes,
        nedb,
        jobs: usize::from(settings.jobs),
        strict: settings.strict,
    };
    let engine = SyncEngine::new(
        direction,
        NormalizedPath::new(data_root),
        NormalizedPath::new(source_root),
        options,
    );

    let (source, target) = engine.roots();
    println!(
        "{} {} {} -> {}",
        "=>".blue().bold(),
        direction.to_string().bold(),
        source.to_string().cyan(),
        target.to_string().cyan()
    );

    let confirm: &dyn Confirm = if yes { &AssumeYes } else { &DialoguerConfirm };
    match engine.run(confirm)? {
        SyncOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
        SyncOutcome::Completed(report) => {
            print_report(&report);
            if report.success(settings.strict) {
                Ok(())
            } else {
                Err(CliError::user(failure_summary(&report, settings.strict)))
            }
        }
    }
}

fn print_report(report: &SyncReport) {
    for pack in &report.packs {
        match &pack.outcome {
            PackOutcome::Converted { records } => println!(
                "   {} {} ({} records)",
                "+".green(),
                pack.name.cyan(),
                records
            ),
            PackOutcome::Skipped { reason } => println!(
                "   {} {} skipped: {}",
                "-".yellow(),
                pack.name.cyan(),
                reason.dimmed()
            ),
            PackOutcome::Failed { error } => {
                println!("   {} {} failed: {}", "!".red(), pack.name.cyan(), error)
            }
        }
    }

    if let Some(path) = &report.manifest_written {
        println!("{} Wrote {}", "=>".blue().bold(), path.to_string().cyan());
    }
    println!(
        "{} {} converted, {} skipped, {} failed",
        "OK".green().bold(),
        report.converted().count(),
        report.skipped().count(),
        report.failed().count()
    );
}

fn failure_summary(report: &SyncReport, strict: bool) -> String {
    let failed = report.failed().count();
    let skipped = report.skipped().count();
    if failed > 0 {
        format!("{} pack(s) failed to convert", failed)
    } else if strict {
        format!("{} pack(s) skipped in strict mode", skipped)
    } else {
        "run did not succeed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pack_test_utils::TestModule;
    use serde_json::json;

    fn settings(module: &TestModule, strict: bool) -> RunSettings {
        RunSettings {
            package_root: module.root().to_path_buf(),
            jobs: 1,
            strict,
        }
    }

    fn spells_module() -> TestModule {
        let module = TestModule::new();
        module.write_manifest(&json!({
            "packs": [{"name": "spells", "type": "Item", "path": "packs/spells"}]
        }));
        module.add_data_pack("spells", &[json!({"_id": "a1", "name": "Fireball"})]);
        module
    }

    #[test]
    fn test_extract_uses_default_directories() {
        let module = spells_module();

        run_extract(&settings(&module, false), None, None, false, true).unwrap();

        module.assert_file_exists("src/packs/spells/fireball_a1.yml");
        module.assert_file_exists("src/module.json");
    }

    #[test]
    fn test_strict_mode_fails_on_skip() {
        let module = spells_module();
        module.write_manifest(&json!({
            "packs": [
                {"name": "spells", "type": "Item", "path": "packs/spells"},
                {"name": "odd", "type": "Nope", "path": "packs/odd"}
            ]
        }));

        let result = run_extract(&settings(&module, true), None, None, false, true);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("strict"), "got: {}", err);
        // Converted packs are still on disk
        module.assert_file_exists("src/packs/spells/fireball_a1.yml");
    }

    #[test]
    fn test_compile_missing_source_is_error() {
        let module = TestModule::new();

        let err = run_compile(&settings(&module, false), None, None, true).unwrap_err();

        assert!(matches!(err, CliError::Core(_)), "got: {:?}", err);
    }
}

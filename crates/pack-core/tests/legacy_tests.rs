//! Tests for legacy extraction driven by the data root's entries

use pack_core::{AssumeYes, Direction, SyncEngine, SyncOptions, SyncOutcome, SyncReport};
use pack_fs::NormalizedPath;
use pack_test_utils::TestModule;
use pretty_assertions::assert_eq;
use serde_json::json;

fn extract_legacy(module: &TestModule, nedb: bool) -> SyncReport {
    let engine = SyncEngine::new(
        Direction::ExtractLegacy,
        NormalizedPath::new(module.data_root()),
        NormalizedPath::new(module.source_root()),
        SyncOptions {
            assume_yes: true,
            nedb,
            ..SyncOptions::default()
        },
    );
    match engine.run(&AssumeYes).unwrap() {
        SyncOutcome::Completed(report) => report,
        SyncOutcome::Cancelled => panic!("run was cancelled"),
    }
}

fn legacy_module() -> TestModule {
    let module = TestModule::new();
    module.write_manifest(&json!({
        "packs": [{"name": "items", "type": "Item", "path": "packs/items.db"}]
    }));
    module.add_legacy_pack(
        "items.db",
        &[
            json!({"_id": "x", "name": "Long Sword"}),
            json!({"_id": "y", "name": "Dagger"}),
            json!({"_id": "y", "$$deleted": true}),
        ],
    );
    module
}

#[test]
fn test_legacy_extract_unknown_entry_is_skipped() {
    let module = legacy_module();
    module.add_legacy_pack("misc.db", &[json!({"_id": "m", "name": "Misc"})]);

    let report = extract_legacy(&module, true);

    assert!(report.pack("items.db").unwrap().is_converted());
    let misc = report.pack("misc.db").unwrap();
    assert!(misc.is_skipped());
    assert_eq!(module.list("src/packs"), vec!["items"]);
    assert_eq!(module.list("src/packs/items"), vec!["long_sword_x.yml"]);
}

#[test]
fn test_legacy_extract_skips_non_db_entries() {
    let module = legacy_module();
    module.write_file("packs/README.md", "notes");

    let report = extract_legacy(&module, true);

    let readme = report.pack("README.md").unwrap();
    assert!(readme.is_skipped());
    assert!(report.success(false));
}

#[test]
fn test_legacy_extract_writes_no_manifest() {
    let module = legacy_module();

    let report = extract_legacy(&module, true);

    assert!(report.manifest_written.is_none());
    module.assert_missing("src/module.json");
}

#[test]
fn test_legacy_extract_directory_entries_without_nedb() {
    let module = TestModule::new();
    module.write_manifest(&json!({
        "packs": [{"name": "actors", "type": "Actor", "path": "packs/actors"}]
    }));
    module.add_data_pack("actors", &[json!({"_id": "h1", "name": "Hero"})]);

    let report = extract_legacy(&module, false);

    assert!(report.pack("actors").unwrap().is_converted());
    assert_eq!(module.list("src/packs/actors"), vec!["hero_h1.yml"]);
}

#[test]
fn test_legacy_extract_requires_manifest() {
    let module = legacy_module();
    std::fs::remove_file(module.root().join("module.json")).unwrap();

    let engine = SyncEngine::new(
        Direction::ExtractLegacy,
        NormalizedPath::new(module.data_root()),
        NormalizedPath::new(module.source_root()),
        SyncOptions {
            assume_yes: true,
            nedb: true,
            ..SyncOptions::default()
        },
    );

    let err = engine.run(&AssumeYes).unwrap_err();
    assert!(err.is_configuration());
}

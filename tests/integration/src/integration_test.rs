//! End-to-end integration test for the full pack lifecycle
//!
//! legacy `.db` packs -> extract-legacy -> source tree -> compile -> data
//! packs -> extract -> source tree, checking that records and manifest
//! fields survive every hop.

use pack_core::{
    AssumeYes, Direction, Manifest, PackDescriptor, SyncEngine, SyncOptions, SyncOutcome,
    SyncReport,
};
use pack_fs::NormalizedPath;
use pack_test_utils::TestModule;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;

fn run(module: &TestModule, direction: Direction, options: SyncOptions) -> SyncReport {
    let engine = SyncEngine::new(
        direction,
        NormalizedPath::new(module.data_root()),
        NormalizedPath::new(module.source_root()),
        SyncOptions {
            assume_yes: true,
            ..options
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
        "id": "demo-module",
        "title": "Demo Module",
        "packs": [
            {"name": "items", "label": "Items", "type": "Item", "path": "packs/items.db"},
            {"name": "heroes", "label": "Heroes", "type": "Actor", "path": "packs/heroes.db"}
        ],
        "flags": {"keep": true}
    }));
    module.add_legacy_pack(
        "items.db",
        &[
            json!({"_id": "x", "name": "Long Sword", "system": {"damage": "1d8"}}),
            json!({"_id": "y", "name": "Dagger"}),
            json!({"_id": "x", "name": "Long Sword", "system": {"damage": "1d10"}}),
            json!({"_id": "y", "$$deleted": true}),
        ],
    );
    module.add_legacy_pack(
        "heroes.db",
        &[json!({"_id": "h1", "name": "Hero"}), json!({"_id": "h2", "name": "Sidekick"})],
    );
    module
}

#[test]
fn test_legacy_to_compiled_to_source() {
    let module = legacy_module();
    let legacy = SyncOptions {
        nedb: true,
        ..SyncOptions::default()
    };

    // 1. Legacy extraction: types come from the manifest, no manifest written
    let report = run(&module, Direction::ExtractLegacy, legacy);
    assert!(report.success(true));
    assert_eq!(module.list("src/packs"), vec!["heroes", "items"]);
    assert_eq!(module.list("src/packs/items"), vec!["long_sword_x.yml"]);
    module.assert_missing("src/module.json");

    // 2. Hand the source tree a manifest, as a maintainer would
    let mut manifest = Manifest::load(&NormalizedPath::new(module.root().join("module.json"))).unwrap();
    for pack in manifest.packs_mut() {
        let path = format!("./packs/{}", pack.name());
        pack.set_path(path);
    }
    manifest
        .save(&NormalizedPath::new(module.root().join("src/module.json")))
        .unwrap();

    // 3. Compile into directory-form data packs
    let report = run(&module, Direction::Compile, SyncOptions::default());
    assert!(report.success(true));
    assert_eq!(module.list("packs"), vec!["heroes", "items"]);
    let items = module.read_json_lines("packs/items/000001.jsonl");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["system"]["damage"], json!("1d10"));
    assert_eq!(items[0]["_key"], json!("!items!x"));
    let heroes = module.read_json_lines("packs/heroes/000001.jsonl");
    let keys: Vec<&Value> = heroes.iter().map(|r| &r["_key"]).collect();
    assert_eq!(keys, vec![&json!("!actors!h1"), &json!("!actors!h2")]);

    let compiled = module.read_json("module.json");
    assert_eq!(compiled["title"], json!("Demo Module"));
    assert_eq!(compiled["flags"], json!({"keep": true}));
    assert_eq!(compiled["packs"][1]["path"], json!("./packs/heroes"));

    // 4. Extract the compiled packs again: same records, same pack set
    let report = run(
        &module,
        Direction::Extract,
        SyncOptions {
            jobs: 2,
            ..SyncOptions::default()
        },
    );
    assert!(report.success(true));
    assert_eq!(module.list("src/packs/items"), vec!["long_sword_x.yml"]);
    assert_eq!(
        module.list("src/packs/heroes"),
        vec!["hero_h1.yml", "sidekick_h2.yml"]
    );

    let extracted = module.read_json("src/module.json");
    let names: Vec<(&Value, &Value)> = extracted["packs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (&p["name"], &p["type"]))
        .collect();
    assert_eq!(
        names,
        vec![(&json!("items"), &json!("Item")), (&json!("heroes"), &json!("Actor"))]
    );
}

#[test]
fn test_compile_is_repeatable() {
    let module = TestModule::new();
    module.write_source_manifest(&json!({
        "packs": [{"name": "macros", "type": "Macro", "path": "./packs/macros"}]
    }));
    module.add_source_record("macros", "roll_m2.yml", "_id: m2\nname: Roll\ncommand: /roll 1d20\n");
    module.add_source_record("macros", "attack_m1.yml", "_id: m1\nname: Attack\n");
    module.add_source_record("macros", "nested/heal_m3.yml", "_id: m3\nname: Heal\n");

    run(&module, Direction::Compile, SyncOptions::default());
    let first = fs::read_to_string(module.root().join("packs/macros/000001.jsonl")).unwrap();
    let first_manifest = fs::read_to_string(module.root().join("module.json")).unwrap();

    run(&module, Direction::Compile, SyncOptions::default());
    let second = fs::read_to_string(module.root().join("packs/macros/000001.jsonl")).unwrap();
    let second_manifest = fs::read_to_string(module.root().join("module.json")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_manifest, second_manifest);
    let ids: Vec<Value> = module
        .read_json_lines("packs/macros/000001.jsonl")
        .into_iter()
        .map(|r| r["_id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("m1"), json!("m2"), json!("m3")]);
}

#[test]
fn test_manifest_built_in_code_drives_extract() {
    let module = TestModule::new();
    let mut manifest = Manifest::from_value(json!({"id": "built"})).unwrap();
    manifest.push_pack(PackDescriptor::new("scenes", "Scene", "packs/scenes"));
    manifest
        .save(&NormalizedPath::new(module.root().join("module.json")))
        .unwrap();
    module.add_data_pack("scenes", &[json!({"_id": "s1", "name": "Tavern"})]);

    let report = run(&module, Direction::Extract, SyncOptions::default());

    assert_eq!(report.converted().count(), 1);
    module.assert_file_exists("src/packs/scenes/tavern_s1.yml");
}

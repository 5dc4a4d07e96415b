//! CLI end-to-end tests that invoke the compiled `packs` binary.

use assert_cmd::Command;
use pack_test_utils::TestModule;
use predicates::prelude::*;
use serde_json::json;

fn packs(module: &TestModule) -> Command {
    let mut cmd = Command::cargo_bin("packs").unwrap();
    cmd.current_dir(module.root())
        .env_remove("PACKS_DATA_DIR")
        .env_remove("PACKS_SOURCE_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn spells_module() -> TestModule {
    let module = TestModule::new();
    module.write_manifest(&json!({
        "title": "Demo",
        "packs": [{"name": "spells", "type": "Item", "path": "packs/spells"}]
    }));
    module.add_data_pack(
        "spells",
        &[
            json!({"_id": "a1", "name": "Fireball"}),
            json!({"_id": "b2", "name": "Magic Missile"}),
            json!({"_id": "c3", "name": "Shield"}),
        ],
    );
    module
}

#[test]
fn test_help_exits_zero() {
    let module = TestModule::new();
    packs(&module)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract-legacy"))
        .stdout(predicate::str::contains("compile"));
}

#[test]
fn test_extract_then_compile() {
    let module = spells_module();

    packs(&module)
        .args(["extract", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spells"))
        .stdout(predicate::str::contains("1 converted"));
    assert_eq!(module.list("src/packs/spells").len(), 3);
    assert_eq!(
        module.read_json("src/module.json")["packs"][0]["path"],
        json!("./packs/spells")
    );

    packs(&module).args(["compile", "-y"]).assert().success();
    assert_eq!(module.read_json_lines("packs/spells/000001.jsonl").len(), 3);
    assert_eq!(module.read_json("module.json")["title"], json!("Demo"));
}

#[test]
fn test_package_root_and_env_directories() {
    let module = spells_module();
    let elsewhere = tempfile::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("packs").unwrap();
    cmd.current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .env("PACKS_SOURCE_DIR", "out/packs")
        .env_remove("PACKS_DATA_DIR")
        .arg("--package-root")
        .arg(module.root())
        .args(["extract", "--yes"])
        .assert()
        .success();

    module.assert_file_exists("out/packs/spells/fireball_a1.yml");
    module.assert_file_exists("out/module.json");
}

#[test]
fn test_missing_source_exits_nonzero() {
    let module = TestModule::new();

    packs(&module)
        .args(["extract", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("doesn't exist"));
}

#[test]
fn test_unreadable_manifest_exits_nonzero() {
    let module = spells_module();
    module.write_file("module.json", "not json");

    packs(&module)
        .args(["extract", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("module.json"));
    module.assert_missing("src/packs");
}

#[test]
fn test_unknown_type_skips_but_succeeds() {
    let module = spells_module();
    module.write_manifest(&json!({
        "packs": [
            {"name": "spells", "type": "Item", "path": "packs/spells"},
            {"name": "odd", "type": "Spellbook", "path": "packs/odd"}
        ]
    }));

    packs(&module)
        .args(["extract", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("odd skipped"));

    packs(&module)
        .args(["--strict", "extract", "-y"])
        .assert()
        .failure();
}

#[test]
fn test_extract_legacy_nedb() {
    let module = TestModule::new();
    module.write_manifest(&json!({
        "packs": [{"name": "items", "type": "Item", "path": "packs/items.db"}]
    }));
    module.add_legacy_pack("items.db", &[json!({"_id": "x", "name": "Long Sword"})]);
    module.add_legacy_pack("misc.db", &[json!({"_id": "m", "name": "Misc"})]);

    packs(&module)
        .args(["extract-legacy", "--nedb", "-y", "--jobs", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("misc.db skipped"));

    assert_eq!(module.list("src/packs"), vec!["items"]);
    module.assert_missing("src/module.json");
}

#[test]
fn test_without_yes_and_no_terminal_touches_nothing() {
    let module = spells_module();
    module.write_file("src/packs/keep.yml", "_id: keep\n");

    // No terminal to prompt on: the run must stop before replacing the target
    packs(&module).arg("extract").assert().failure();

    module.assert_file_exists("src/packs/keep.yml");
}

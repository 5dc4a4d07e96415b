//! Tests for manifest load/save

use pack_core::{Error, Manifest, PackDescriptor};
use pack_fs::NormalizedPath;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_preserves_field_order_and_passthrough() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("module.json"));
    fs::write(
        path.to_native(),
        r#"{"zeta": 1, "packs": [{"path": "p", "name": "n", "type": "Item", "flags": {"x": true}}], "alpha": [1, 2]}"#,
    )
    .unwrap();

    let mut manifest = Manifest::load(&path).unwrap();
    manifest.packs_mut()[0].set_path("./packs/n");
    manifest.save(&path).unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert!(content.ends_with('\n'));
    assert!(content.contains("\n  \"zeta\": 1"), "two-space indent: {}", content);
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "packs", "alpha"]);
    assert_eq!(
        value["packs"][0],
        json!({"path": "./packs/n", "name": "n", "type": "Item", "flags": {"x": true}})
    );
}

#[test]
fn test_missing_manifest_is_unreadable() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("module.json"));

    let err = Manifest::load(&path).unwrap_err();

    assert!(matches!(err, Error::ManifestUnreadable { .. }), "got: {:?}", err);
}

#[test]
fn test_wrong_shape_is_unreadable() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("module.json"));
    fs::write(path.to_native(), r#"{"packs": "nope"}"#).unwrap();

    let err = Manifest::load(&path).unwrap_err();

    assert!(err.to_string().contains("packs is not an array"), "got: {}", err);
}

#[test]
fn test_push_pack_adds_packs_key() {
    let mut manifest = Manifest::from_value(json!({"id": "demo"})).unwrap();
    manifest.push_pack(PackDescriptor::new("spells", "Item", "./packs/spells"));

    assert_eq!(
        manifest.to_value(),
        json!({"id": "demo", "packs": [{"name": "spells", "type": "Item", "path": "./packs/spells"}]})
    );
    assert_eq!(manifest.metadata("id"), Some(&json!("demo")));
    assert!(manifest.pack("spells").is_some());
}

#[test]
fn test_validate_rejects_empty_name() {
    let manifest = Manifest::from_value(json!({"packs": [{"name": "", "type": "Item"}]})).unwrap();

    assert!(matches!(manifest.validate(), Err(Error::Configuration { .. })));
}

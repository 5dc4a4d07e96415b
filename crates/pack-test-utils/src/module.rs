//! [`TestModule`] builder for pack-sync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary module directory laid out as
///
/// ```text
/// <root>/module.json
/// <root>/packs/...        data form
/// <root>/src/packs/...    source form
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use pack_test_utils::TestModule;
/// use serde_json::json;
///
/// let module = TestModule::new();
/// module.write_manifest(&json!({"packs": [{"name": "spells", "type": "Item", "path": "packs/spells"}]}));
/// module.add_data_pack("spells", &[json!({"_id": "a", "name": "Fireball"})]);
/// module.assert_file_exists("packs/spells/000001.jsonl");
/// ```
pub struct TestModule {
    temp_dir: TempDir,
}

impl Default for TestModule {
    fn default() -> Self {
        Self::new()
    }
}

impl TestModule {
    /// Create an empty temporary module directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the module.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<root>/packs`
    pub fn data_root(&self) -> PathBuf {
        self.root().join("packs")
    }

    /// `<root>/src/packs`
    pub fn source_root(&self) -> PathBuf {
        self.root().join("src").join("packs")
    }

    /// Write `<root>/module.json`.
    pub fn write_manifest(&self, manifest: &Value) {
        self.write_json(&self.root().join("module.json"), manifest);
    }

    /// Write `<root>/src/module.json`.
    pub fn write_source_manifest(&self, manifest: &Value) {
        self.write_json(&self.root().join("src").join("module.json"), manifest);
    }

    /// Read and parse a JSON file relative to the root.
    pub fn read_json(&self, relative: &str) -> Value {
        let content = fs::read_to_string(self.root().join(relative))
            .unwrap_or_else(|e| panic!("TestModule::read_json: {}: {}", relative, e));
        serde_json::from_str(&content).unwrap()
    }

    /// Write a directory-form data pack `<root>/packs/<name>/000001.jsonl`.
    pub fn add_data_pack(&self, name: &str, records: &[Value]) {
        let dir = self.data_root().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("000001.jsonl"), json_lines(records)).unwrap();
    }

    /// Write a legacy single-file pack `<root>/packs/<file_name>`.
    pub fn add_legacy_pack(&self, file_name: &str, records: &[Value]) {
        fs::create_dir_all(self.data_root()).unwrap();
        fs::write(self.data_root().join(file_name), json_lines(records)).unwrap();
    }

    /// Write a source-form record `<root>/src/packs/<pack>/<file_name>` as YAML text.
    pub fn add_source_record(&self, pack: &str, file_name: &str, yaml: &str) {
        let path = self.source_root().join(pack).join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, yaml).unwrap();
    }

    /// Write an arbitrary file relative to the root.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Sorted file names directly under a directory relative to the root.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(relative))
            .unwrap_or_else(|e| panic!("TestModule::list: {}: {}", relative, e))
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Parse every line of a JSON-lines file relative to the root.
    pub fn read_json_lines(&self, relative: &str) -> Vec<Value> {
        fs::read_to_string(self.root().join(relative))
            .unwrap()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    /// Assert that a file exists at the given path relative to the root.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that nothing exists at the given path relative to the root.
    pub fn assert_missing(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(!path.exists(), "Expected path to be absent: {}", path.display());
    }

    fn write_json(&self, path: &Path, value: &Value) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }
}

fn json_lines(records: &[Value]) -> String {
    records
        .iter()
        .map(|r| format!("{}\n", serde_json::to_string(r).unwrap()))
        .collect()
}

//! Module manifest model
//!
//! The manifest is kept as an order-preserving JSON object so that every
//! field the engine does not own (title, authors, flags, per-pack labels…)
//! is written back exactly where it was read. The engine only ever changes
//! the `path` of a pack descriptor.

use std::collections::HashSet;

use pack_codec::DocumentType;
use pack_fs::{DocumentStore, NormalizedPath, PackPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

const PACKS_FIELD: &str = "packs";
const NAME_FIELD: &str = "name";
const TYPE_FIELD: &str = "type";
const PATH_FIELD: &str = "path";

/// One pack entry of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackDescriptor(Map<String, Value>);

impl PackDescriptor {
    pub fn new(name: &str, document_type: &str, path: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(NAME_FIELD.into(), Value::String(name.into()));
        fields.insert(TYPE_FIELD.into(), Value::String(document_type.into()));
        fields.insert(PATH_FIELD.into(), Value::String(path.into()));
        Self(fields)
    }

    pub fn name(&self) -> &str {
        self.0.get(NAME_FIELD).and_then(Value::as_str).unwrap_or_default()
    }

    /// The raw document type tag, if present.
    pub fn document_type(&self) -> Option<&str> {
        self.0.get(TYPE_FIELD).and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.0.get(PATH_FIELD).and_then(Value::as_str)
    }

    /// Replace the path, keeping the field's position if it already exists.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.0.insert(PATH_FIELD.into(), Value::String(path.into()));
    }

    /// Resolve the document type tag.
    pub fn resolve_document_type(&self) -> Result<DocumentType> {
        let value = self.document_type().ok_or_else(|| Error::MissingDocumentType {
            name: self.name().to_string(),
        })?;
        value.parse().map_err(|_| Error::UnknownDocumentType {
            name: self.name().to_string(),
            value: value.to_string(),
        })
    }

    /// Any other field, passed through untouched.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A parsed module manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Full document; its `packs` entry is refreshed from `packs` on save
    document: Map<String, Value>,
    packs: Vec<PackDescriptor>,
}

impl Manifest {
    /// Conventional manifest location for a pack root: `<root>/../module.json`.
    pub fn path_for_root(root: &NormalizedPath) -> NormalizedPath {
        root.join("..").join(PackPath::ManifestFile.as_str())
    }

    /// Build a manifest from a parsed JSON value.
    ///
    /// The value must be an object; `packs`, when present, must be an array
    /// of objects each carrying a string `name`.
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let Value::Object(document) = value else {
            return Err("top level is not an object".to_string());
        };

        let packs = match document.get(PACKS_FIELD) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| match entry {
                    Value::Object(fields) if fields.get(NAME_FIELD).is_some_and(Value::is_string) => {
                        Ok(PackDescriptor(fields.clone()))
                    }
                    Value::Object(_) => Err(format!("packs[{}] has no string name", i)),
                    _ => Err(format!("packs[{}] is not an object", i)),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(_) => return Err("packs is not an array".to_string()),
        };

        Ok(Self { document, packs })
    }

    /// Load a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestUnreadable`] if the file is missing, is not
    /// JSON, or does not have the manifest shape.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let unreadable = |reason: String| Error::ManifestUnreadable {
            path: path.to_native(),
            reason,
        };
        let value: Value = DocumentStore::new()
            .load(path)
            .map_err(|e| unreadable(e.to_string()))?;
        Self::from_value(value).map_err(unreadable)
    }

    /// Write the manifest atomically with stable two-space formatting.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        DocumentStore::new().save(path, &self.to_value())?;
        Ok(())
    }

    /// The full document with the current pack descriptors in place.
    pub fn to_value(&self) -> Value {
        let mut document = self.document.clone();
        if document.contains_key(PACKS_FIELD) || !self.packs.is_empty() {
            let packs = self.packs.iter().map(|p| Value::Object(p.0.clone())).collect();
            document.insert(PACKS_FIELD.into(), Value::Array(packs));
        }
        Value::Object(document)
    }

    pub fn packs(&self) -> &[PackDescriptor] {
        &self.packs
    }

    pub fn packs_mut(&mut self) -> &mut [PackDescriptor] {
        &mut self.packs
    }

    pub fn push_pack(&mut self, pack: PackDescriptor) {
        self.packs.push(pack);
    }

    pub fn pack(&self, name: &str) -> Option<&PackDescriptor> {
        self.packs.iter().find(|p| p.name() == name)
    }

    /// Top-level passthrough metadata (`id`, `title`, `version`, …).
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Reject manifests whose pack names are empty or repeated.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pack in &self.packs {
            if pack.name().is_empty() {
                return Err(Error::Configuration {
                    message: "manifest contains a pack with an empty name".to_string(),
                });
            }
            if !seen.insert(pack.name()) {
                return Err(Error::DuplicatePack {
                    name: pack.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// First descriptor whose `path` ends in the file name `file_name`.
    ///
    /// Matching is on the final path component, so `items.db` matches
    /// `packs/items.db` but not `packs/magic-items.db`.
    pub fn find_by_file_name(&self, file_name: &str) -> Option<&PackDescriptor> {
        self.packs.iter().find(|p| {
            p.path()
                .map(NormalizedPath::new)
                .is_some_and(|path| path.file_name() == Some(file_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_accessors() {
        let pack = PackDescriptor::new("spells", "Item", "packs/spells");
        assert_eq!(pack.name(), "spells");
        assert_eq!(pack.document_type(), Some("Item"));
        assert_eq!(pack.path(), Some("packs/spells"));
        assert_eq!(pack.resolve_document_type().unwrap(), DocumentType::Item);
    }

    #[test]
    fn unknown_type_does_not_resolve() {
        let pack = PackDescriptor::new("odd", "Spellbook", "packs/odd");
        assert!(matches!(
            pack.resolve_document_type(),
            Err(Error::UnknownDocumentType { .. })
        ));
    }

    #[test]
    fn from_value_rejects_non_object() {
        assert!(Manifest::from_value(json!([1, 2])).is_err());
        assert!(Manifest::from_value(json!({"packs": {}})).is_err());
        assert!(Manifest::from_value(json!({"packs": [{"type": "Item"}]})).is_err());
    }

    #[test]
    fn manifest_without_packs_round_trips_without_packs_key() {
        let manifest = Manifest::from_value(json!({"id": "demo"})).unwrap();
        assert_eq!(manifest.to_value(), json!({"id": "demo"}));
    }

    #[test]
    fn path_for_root_is_one_level_up() {
        let root = NormalizedPath::new("/module/src/packs");
        assert_eq!(Manifest::path_for_root(&root).as_str(), "/module/src/module.json");
    }

    #[test]
    fn find_by_file_name_matches_last_component_first_wins() {
        let manifest = Manifest::from_value(json!({
            "packs": [
                {"name": "magic", "type": "Item", "path": "packs/magic-items.db"},
                {"name": "items", "type": "Item", "path": "packs/items.db"},
                {"name": "items-copy", "type": "Actor", "path": "other/items.db"}
            ]
        }))
        .unwrap();

        assert_eq!(manifest.find_by_file_name("items.db").unwrap().name(), "items");
        assert!(manifest.find_by_file_name("misc.db").is_none());
    }
}

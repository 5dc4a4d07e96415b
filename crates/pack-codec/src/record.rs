//! Helpers shared by record readers and writers

use std::path::Path;

use pack_fs::validate_path_identifier;
use serde_json::{Map, Value};

use crate::{DocumentType, Error, Result};

pub(crate) type Record = Map<String, Value>;

pub(crate) const KEY_FIELD: &str = "_key";
pub(crate) const ID_FIELD: &str = "_id";

pub(crate) fn into_record(value: Value, path: &Path) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

pub(crate) fn record_id<'a>(record: &'a Record, path: &Path) -> Result<&'a str> {
    record
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingId {
            path: path.to_path_buf(),
        })
}

/// Return the record's data-form key, adding `_key` when absent.
pub(crate) fn ensure_key(record: &mut Record, document_type: DocumentType, path: &Path) -> Result<String> {
    if let Some(key) = record.get(KEY_FIELD).and_then(Value::as_str) {
        return Ok(key.to_string());
    }
    let key = document_type.record_key(record_id(record, path)?);
    record.insert(KEY_FIELD.to_string(), Value::String(key.clone()));
    Ok(key)
}

/// File name for a record in source form: `<slug(name)>_<id>.yml`.
pub(crate) fn source_file_name(record: &Record, path: &Path) -> Result<String> {
    let id = record_id(record, path)?;
    validate_path_identifier(id, "Record id").map_err(|message| Error::UnsafeId {
        path: path.to_path_buf(),
        id: id.to_string(),
        message,
    })?;
    let name = record.get("name").and_then(Value::as_str).unwrap_or("");
    Ok(format!("{}_{}.yml", slug(name), id))
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

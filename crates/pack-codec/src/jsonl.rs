//! Built-in codec: JSON-lines data form, YAML source form
//!
//! Data form comes in two flavours:
//!
//! - **legacy**: a single `<name>.db` file holding one JSON object per line,
//!   append-only. A later line with the same `_id` replaces an earlier one,
//!   `"$$deleted": true` drops the record and `$$indexCreated` lines are
//!   index metadata.
//! - **directory**: a pack directory of `*.jsonl` segments read in file name
//!   order. Compiling always writes one segment with records sorted by key.
//!
//! Source form is one YAML file per record.

use std::collections::BTreeMap;
use std::fs;

use pack_fs::{DocumentStore, NormalizedPath, RobustnessConfig, io};
use serde_json::Value;
use tracing::{debug, warn};

use crate::record::{ID_FIELD, Record, ensure_key, into_record, record_id, source_file_name};
use crate::{CodecOptions, DocumentType, Error, PackCodec, Result};

const SEGMENT_EXTENSION: &str = "jsonl";
const COMPILED_SEGMENT: &str = "000001.jsonl";
const SOURCE_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];
const DELETED_MARKER: &str = "$$deleted";
const INDEX_MARKER: &str = "$$indexCreated";

/// Codec for JSON-lines data packs and YAML source trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLinesCodec {
    store: DocumentStore,
    robustness: RobustnessConfig,
}

impl JsonLinesCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_robustness(robustness: RobustnessConfig) -> Self {
        Self {
            store: DocumentStore::with_robustness(robustness),
            robustness,
        }
    }

    /// Read every live record of a data-form pack, keyed and sorted.
    fn read_data(
        &self,
        source: &NormalizedPath,
        options: &CodecOptions,
    ) -> Result<BTreeMap<String, Record>> {
        if !source.exists() {
            return Err(Error::SourceNotFound {
                path: source.to_native(),
            });
        }

        let mut records = BTreeMap::new();
        if options.legacy_format {
            if !source.is_file() {
                return Err(Error::io(
                    source.to_native(),
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "legacy pack must be a single file",
                    ),
                ));
            }
            let content = io::read_text(source)?;
            apply_lines(source, &content, options.document_type, &mut records)?;
            return Ok(records);
        }

        if !source.is_dir() {
            return Err(Error::io(
                source.to_native(),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "pack must be a directory of .jsonl segments",
                ),
            ));
        }
        let mut segments: Vec<NormalizedPath> = list_dir(source)?
            .into_iter()
            .filter(|p| p.is_file() && p.extension() == Some(SEGMENT_EXTENSION))
            .collect();
        segments.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for segment in &segments {
            let content = io::read_text(segment)?;
            apply_lines(segment, &content, options.document_type, &mut records)?;
        }
        Ok(records)
    }

    fn collect_source_files(&self, dir: &NormalizedPath, out: &mut Vec<NormalizedPath>) -> Result<()> {
        for entry in list_dir(dir)? {
            let hidden = entry.file_name().is_some_and(|n| n.starts_with('.'));
            if hidden {
                continue;
            }
            if entry.is_dir() {
                self.collect_source_files(&entry, out)?;
            } else if entry
                .extension()
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            {
                out.push(entry);
            }
        }
        Ok(())
    }
}

impl PackCodec for JsonLinesCodec {
    fn extract(
        &self,
        source: &NormalizedPath,
        target: &NormalizedPath,
        options: &CodecOptions,
    ) -> Result<usize> {
        let records = self.read_data(source, options)?;
        let native = source.to_native();

        for record in records.values() {
            let file = target.join(&source_file_name(record, &native)?);
            debug!(record = %file, "Writing source record");
            self.store.save(&file, record)?;
        }
        Ok(records.len())
    }

    fn compile(
        &self,
        source: &NormalizedPath,
        target: &NormalizedPath,
        options: &CodecOptions,
    ) -> Result<usize> {
        if !source.is_dir() {
            return Err(Error::SourceNotFound {
                path: source.to_native(),
            });
        }

        let mut files = Vec::new();
        self.collect_source_files(source, &mut files)?;
        files.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut records: BTreeMap<String, Record> = BTreeMap::new();
        for file in &files {
            let value: Value = self.store.load(file)?;
            let native = file.to_native();
            let mut record = into_record(value, &native)?;
            let key = ensure_key(&mut record, options.document_type, &native)?;
            if records.insert(key.clone(), record).is_some() {
                warn!("Duplicate record key {} in {}, later file wins", key, file);
            }
        }

        let mut content = String::new();
        for record in records.values() {
            let line = serde_json::to_string(record)
                .map_err(|e| Error::io(target.to_native(), std::io::Error::from(e)))?;
            content.push_str(&line);
            content.push('\n');
        }
        io::write_atomic(&target.join(COMPILED_SEGMENT), content.as_bytes(), self.robustness)?;
        Ok(records.len())
    }
}

fn list_dir(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native = dir.to_native();
    let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        paths.push(NormalizedPath::new(entry.path()));
    }
    Ok(paths)
}

/// Fold JSON lines into `records`, honoring replacement and deletion.
fn apply_lines(
    path: &NormalizedPath,
    content: &str,
    document_type: DocumentType,
    records: &mut BTreeMap<String, Record>,
) -> Result<()> {
    let native = path.to_native();
    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| Error::MalformedRecord {
            path: native.clone(),
            line: line_no,
            message: e.to_string(),
        })?;
        let mut record = into_record(value, &native)?;
        if record.contains_key(INDEX_MARKER) {
            continue;
        }

        let deleted = record.get(DELETED_MARKER).and_then(Value::as_bool) == Some(true);
        if deleted {
            let id = record_id(&record, &native)?;
            let key = document_type.record_key(id);
            records.retain(|k, r| {
                k != &key && r.get(ID_FIELD).and_then(Value::as_str) != Some(id)
            });
            continue;
        }

        let key = ensure_key(&mut record, document_type, &native)?;
        records.insert(key, record);
    }
    Ok(())
}

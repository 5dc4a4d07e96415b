//! Format-aware document loading and saving

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Format-aware document store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently. JSON output is pretty
/// printed with two-space indentation and a trailing newline so manifests
/// diff cleanly.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentStore {
    robustness: io::RobustnessConfig,
}

impl DocumentStore {
    /// Create a new DocumentStore with default robustness settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new DocumentStore with custom robustness settings.
    pub fn with_robustness(robustness: io::RobustnessConfig) -> Self {
        Self { robustness }
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let extension = path.extension().unwrap_or("").to_lowercase();
        // Reject before touching disk so callers see the format problem first
        if !matches!(extension.as_str(), "json" | "yaml" | "yml") {
            return Err(Error::UnsupportedFormat { extension });
        }

        let content = io::read_text(path)?;
        match extension.as_str() {
            "json" => serde_json::from_str(&content).map_err(|e| Error::Parse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => serde_yaml::from_str(&content).map_err(|e| Error::Parse {
                path: path.to_native(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
        }
    }

    /// Save a document to a file.
    ///
    /// Format is determined from file extension.
    /// Uses atomic write to prevent corruption.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let extension = path.extension().unwrap_or("");

        let content = match extension.to_lowercase().as_str() {
            "json" => {
                let mut text = serde_json::to_string_pretty(value).map_err(|e| Error::Serialize {
                    path: path.to_native(),
                    format: "JSON".into(),
                    message: e.to_string(),
                })?;
                text.push('\n');
                text
            }
            "yaml" | "yml" => serde_yaml::to_string(value).map_err(|e| Error::Serialize {
                path: path.to_native(),
                format: "YAML".into(),
                message: e.to_string(),
            })?,
            _ => {
                return Err(Error::UnsupportedFormat {
                    extension: extension.to_string(),
                });
            }
        };

        io::write_atomic(path, content.as_bytes(), self.robustness)
    }
}

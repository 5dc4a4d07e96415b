//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Dot segments are resolved on construction, so `a/./b/../c` becomes
/// `a/c`. A `..` that would climb above an absolute root is dropped, as is
/// a leading `..` on a relative path. Use [`resolve_within`] when escaping a
/// root must be an error rather than a clamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        Self {
            inner: normalize(&raw),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving any dot segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        Self {
            inner: normalize(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 && !self.inner.ends_with(":/") => {
                let parent = &self.inner[..idx];
                if parent.ends_with(':') {
                    Some(Self {
                        inner: format!("{}/", parent),
                    })
                } else {
                    Some(Self {
                        inner: parent.to_string(),
                    })
                }
            }
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && !name.ends_with(':'))
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Whether the path carries a root (`/` or a drive prefix).
    pub fn is_absolute(&self) -> bool {
        !root_prefix(&self.inner).is_empty()
    }

    /// Segment-wise prefix check: `/a/b` starts with `/a` but not with `/a/b2`.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        if self.inner == base.inner || (base.inner == "." && !self.is_absolute()) {
            return true;
        }
        let prefix = if base.inner.ends_with('/') {
            base.inner.clone()
        } else {
            format!("{}/", base.inner)
        };
        self.inner.starts_with(&prefix)
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Root prefix of a slash-normalized path: `/`, `C:/`, `C:` or empty.
fn root_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if path.starts_with('/') {
        "/"
    } else if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.get(2) == Some(&b'/') {
            &path[..3]
        } else {
            &path[..2]
        }
    } else {
        ""
    }
}

fn normalize(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let prefix = root_prefix(&slashed);
    let rest = &slashed[prefix.len()..];

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match prefix {
        "" if body.is_empty() => ".".to_string(),
        "" => body,
        p if p.ends_with(':') => format!("{}/{}", p, body),
        p => format!("{}{}", p, body),
    }
}

/// Validate that a value is safe to use as a single path component.
///
/// Rejects empty values, dot segments, separators, drive prefixes and NUL.
/// Returns a human-readable message naming `label` on failure.
pub fn validate_path_identifier(value: &str, label: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", label));
    }
    if value == "." || value.contains("..") {
        return Err(format!(
            "{} '{}' must not contain path traversal segments",
            label, value
        ));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(format!(
            "{} '{}' must not contain path separators",
            label, value
        ));
    }
    if !root_prefix(value).is_empty() {
        return Err(format!("{} '{}' must not be an absolute path", label, value));
    }
    if value.contains('\0') {
        return Err(format!("{} '{}' must not contain NUL bytes", label, value));
    }
    Ok(())
}

/// Resolve `relative` against `root`, failing if the result leaves `root`.
///
/// Absolute inputs are rejected outright; relative inputs are joined and
/// normalized, then checked segment-wise against the root.
pub fn resolve_within(root: &NormalizedPath, relative: &str) -> Result<NormalizedPath> {
    let slashed = relative.replace('\\', "/");
    let escapes = || Error::PathTraversal {
        path: relative.to_string(),
        root: root.to_string(),
    };

    if !root_prefix(&slashed).is_empty() {
        return Err(escapes());
    }

    // Track depth so `a/../../b` is caught even when the root itself is relative.
    let mut depth: usize = 0;
    for segment in slashed.split('/') {
        match segment {
            "" | "." => {}
            ".." => depth = depth.checked_sub(1).ok_or_else(escapes)?,
            _ => depth += 1,
        }
    }

    let resolved = root.join(&slashed);
    if !resolved.starts_with(root) {
        return Err(escapes());
    }
    Ok(resolved)
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

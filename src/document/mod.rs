//! Ordered YAML document loading and storing.
//!
//! Documents are handled as [`serde_yaml::Mapping`], which preserves key
//! insertion order, so the generated fragment keeps the same key order as
//! the include document it was derived from. Anything that removes keys from
//! a mapping must use `shift_remove` — plain `remove` swap-removes and would
//! reorder the surviving keys.

use crate::core::IncludeGenError;
use crate::utils::fs::{read_text_file, safe_write};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// A YAML mapping loaded from disk together with its provenance.
///
/// The role ("include document" / "element document") and the path travel
/// with the mapping so that errors raised deep in the transformation can
/// still name the offending file.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// The parsed top-level mapping, in file order.
    pub mapping: Mapping,
    role: String,
    path: String,
}

impl LoadedDocument {
    /// Load a document from `path`.
    ///
    /// # Errors
    /// Returns [`IncludeGenError::MissingInput`] if the file is absent or
    /// unreadable, and [`IncludeGenError::YamlParse`] if it is not a YAML
    /// mapping.
    pub fn load(path: &Path, role: &str) -> Result<Self, IncludeGenError> {
        let text = read_text_file(path).map_err(|e| {
            tracing::debug!("failed to read {}: {e:#}", path.display());
            IncludeGenError::MissingInput {
                role: role.to_string(),
                path: path.display().to_string(),
            }
        })?;

        Self::from_str(&text, role, &path.display().to_string())
    }

    /// Parse a document from an in-memory YAML string.
    ///
    /// # Errors
    /// Returns [`IncludeGenError::YamlParse`] if the text is not valid YAML
    /// or its top level is not a mapping.
    pub fn from_str(text: &str, role: &str, path: &str) -> Result<Self, IncludeGenError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| IncludeGenError::YamlParse {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        match value {
            Value::Mapping(mapping) => Ok(Self {
                mapping,
                role: role.to_string(),
                path: path.to_string(),
            }),
            _ => Err(IncludeGenError::YamlParse {
                path: path.to_string(),
                reason: "top-level value is not a mapping".to_string(),
            }),
        }
    }

    /// Which input this document is ("include document" / "element document").
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The path this document was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Build a [`IncludeGenError::MalformedInput`] naming this document and `key`.
    #[must_use]
    pub fn malformed(&self, key: &str) -> IncludeGenError {
        IncludeGenError::MalformedInput {
            role: self.role.clone(),
            path: self.path.clone(),
            key: key.to_string(),
        }
    }
}

/// Serialize `mapping` in block style and write it atomically to `path`.
///
/// The full document is built in memory before the destination is touched,
/// and the write goes through a temp-file-then-rename, so a failure never
/// leaves a truncated fragment behind.
///
/// # Errors
/// Returns [`IncludeGenError::Serialize`] if serialization fails and
/// [`IncludeGenError::WriteFailed`] if the destination cannot be written.
pub fn store_document(path: &Path, mapping: &Mapping) -> Result<(), IncludeGenError> {
    let text = serde_yaml::to_string(mapping).map_err(|e| IncludeGenError::Serialize {
        reason: e.to_string(),
    })?;

    safe_write(path, &text).map_err(|e| IncludeGenError::WriteFailed {
        path: path.display().to_string(),
        reason: format!("{e:#}"),
    })
}

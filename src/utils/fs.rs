//! File system utilities for safe, atomic file operations.
//!
//! All write operations here use a write-then-rename strategy so a failed run
//! never leaves a truncated file behind. The generated fragment is built
//! fully in memory before any byte reaches the destination directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads a text file with path context attached to any failure.
///
/// # Errors
/// Returns an error with the offending path if the file cannot be read.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Atomically writes a string to a file using a write-then-rename strategy.
///
/// This is a convenience wrapper around [`atomic_write`] that handles
/// string-to-bytes conversion.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file.
///
/// The content is written to a sibling temporary file (`.tmp` extension),
/// synced to disk, and then renamed over the target path. Readers never see
/// a partially written file, and an interrupted write leaves the original
/// target untouched.
///
/// Parent directories are created if they do not exist.
///
/// # Errors
/// Returns an error if the temporary file cannot be created, written,
/// synced, or renamed into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("failed to create temp file {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("failed to write to temp file {}", temp_path.display()))?;

        file.sync_all().with_context(|| "failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to rename temp file to {}", path.display()))?;

    Ok(())
}

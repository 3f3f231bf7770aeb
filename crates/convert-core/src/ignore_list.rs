//! `.gitignore` maintenance

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Append `entry` to the ignore list at `path` unless a line already matches
///
/// A missing file is created. Returns `true` when the entry was appended.
pub fn ensure_listed(path: &Path, entry: &str) -> Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("Failed to read {}", path.display())),
    };

    if existing.lines().any(|line| line == entry) {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(entry);
    updated.push('\n');

    fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

//! Removal of Java project artifacts and module directory setup

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Delete each artifact under `root` that exists, file or directory
///
/// Returns the artifacts that were actually removed.
pub fn remove_java_artifacts(root: &Path, artifacts: &[&str]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for artifact in artifacts {
        let path = root.join(artifact);
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to inspect {}", path.display()))
            }
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
        } else {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
        }

        removed.push(PathBuf::from(artifact));
    }

    Ok(removed)
}

/// Create `dir` under `root` and touch a `.gitkeep` inside it so the empty
/// directory survives a commit.
pub fn ensure_modules_dir(root: &Path, dir: &str) -> Result<PathBuf> {
    let modules = root.join(dir);
    fs::create_dir_all(&modules)
        .with_context(|| format!("Failed to create directory: {}", modules.display()))?;

    let keep = modules.join(".gitkeep");
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&keep)
        .with_context(|| format!("Failed to touch {}", keep.display()))?;

    Ok(modules)
}

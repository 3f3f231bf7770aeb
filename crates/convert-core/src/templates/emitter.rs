//! Template payload writing with clobber protection

use super::{Template, WritePolicy};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// What happened to a single template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    Written,
    /// Destination already existed and the policy is [`WritePolicy::IfAbsent`]
    Skipped,
}

/// Write every template under `root`, in order
pub async fn emit_templates(
    root: &Path,
    templates: &[Template],
) -> Result<Vec<(&'static str, Emitted)>> {
    let mut results = Vec::with_capacity(templates.len());

    for template in templates {
        let emitted = emit_template(root, template).await?;
        results.push((template.path, emitted));
    }

    Ok(results)
}

/// Write one template under `root`, honoring its [`WritePolicy`]
pub async fn emit_template(root: &Path, template: &Template) -> Result<Emitted> {
    let target_path = root.join(template.path);

    if template.policy == WritePolicy::IfAbsent
        && fs::try_exists(&target_path)
            .await
            .with_context(|| format!("Failed to check {}", target_path.display()))?
    {
        return Ok(Emitted::Skipped);
    }

    // Ensure parent directories exist
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(&target_path, template.contents)
        .await
        .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

    if template.executable {
        make_executable(&target_path).await?;
    }

    Ok(Emitted::Written)
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .with_context(|| format!("Failed to mark executable: {}", path.display()))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

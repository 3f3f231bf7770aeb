//! Git staging and commits for the converted application

use crate::runtime::process::run_streaming;
use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Git working tree rooted at the application directory
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run `git add <path>` once per path
    ///
    /// Every path is attempted regardless of earlier failures. The statuses
    /// come back paired with their path so the caller can report them.
    pub async fn stage<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<(PathBuf, ExitStatus)>> {
        let mut statuses = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let args = [OsStr::new("add"), path.as_os_str()];
            let status = run_streaming("git", args, &self.root).await?;
            statuses.push((path.to_path_buf(), status));
        }
        Ok(statuses)
    }

    /// `git commit -am <message>`
    pub async fn commit_all(&self, message: &str) -> Result<ExitStatus> {
        run_streaming("git", ["commit", "-am", message], &self.root).await
    }
}

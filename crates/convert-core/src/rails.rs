//! Rails application bootstrap on top of a converted project
//!
//! The application is generated in place: `rails new` runs from the parent
//! directory with the application root's own name, so the generator fills
//! the converted checkout rather than creating a sibling.

use crate::runtime::process::run_streaming;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use walkdir::WalkDir;

/// Top-level entries never staged after generation
const UNSTAGED: &[&str] = &["tmp", ".bundle", ".git"];

/// Rails generation for one application directory
#[derive(Debug, Clone)]
pub struct RailsSetup {
    app_dir: PathBuf,
    app_name: String,
    torquebox_home: PathBuf,
    ignore_entry: String,
}

impl RailsSetup {
    /// `ignore_entry` is the converter's own file name, kept out of the commit
    pub fn new(app_dir: &Path, torquebox_home: &Path, ignore_entry: &str) -> Result<Self> {
        let app_name = app_dir
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| {
                format!("Cannot derive an application name from {}", app_dir.display())
            })?
            .to_string();

        if app_dir.parent().is_none() {
            anyhow::bail!("{} has no parent directory", app_dir.display());
        }

        Ok(Self {
            app_dir: app_dir.to_path_buf(),
            app_name,
            torquebox_home: torquebox_home.to_path_buf(),
            ignore_entry: ignore_entry.to_string(),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    fn parent_dir(&self) -> &Path {
        // checked in `new`
        self.app_dir.parent().unwrap_or(&self.app_dir)
    }

    /// Arguments passed to `jruby` for `rails new`
    pub fn rails_new_args(&self) -> Vec<String> {
        let share = self.torquebox_home.join("share").join("rails");
        vec![
            "-S".to_string(),
            "rails".to_string(),
            "new".to_string(),
            self.app_name.clone(),
            "-m".to_string(),
            share.join("template.rb").display().to_string(),
            "-b".to_string(),
            share.join("openshift_app_builder.rb").display().to_string(),
            "--skip-bundle".to_string(),
        ]
    }

    /// `jruby -S gem install rails`
    pub async fn install_rails(&self) -> Result<ExitStatus> {
        run_streaming("jruby", ["-S", "gem", "install", "rails"], &self.app_dir).await
    }

    /// `jruby -S rails new <app> ...` from the parent directory
    pub async fn generate(&self) -> Result<ExitStatus> {
        run_streaming("jruby", self.rails_new_args(), self.parent_dir()).await
    }

    /// `bundle install --without assets` inside the application
    pub async fn bundle(&self) -> Result<ExitStatus> {
        run_streaming("bundle", ["install", "--without", "assets"], &self.app_dir).await
    }

    /// Top-level entries of the application directory to stage, sorted by name
    pub fn stageable_entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.app_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry =
                entry.with_context(|| format!("Failed to list {}", self.app_dir.display()))?;
            let name = entry.file_name().to_string_lossy();
            if name == self.ignore_entry || UNSTAGED.contains(&&*name) {
                continue;
            }
            entries.push(PathBuf::from(entry.file_name()));
        }
        Ok(entries)
    }

    pub fn commit_message(&self) -> String {
        format!("Added rails application for app {}.", self.app_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn shop() -> RailsSetup {
        let app = Path::new("/srv/apps/shop");
        RailsSetup::new(app, Path::new("/opt/torquebox"), "java-to-ruby").unwrap()
    }

    #[test]
    fn test_app_name_from_directory() {
        let setup = shop();

        assert_eq!(setup.app_name(), "shop");
        assert_eq!(setup.commit_message(), "Added rails application for app shop.");
    }

    #[test]
    fn test_root_has_no_app_name() {
        let setup = RailsSetup::new(Path::new("/"), Path::new("/opt/torquebox"), "java-to-ruby");
        assert!(setup.is_err());
    }

    #[test]
    fn test_rails_new_args() {
        let setup = shop();

        assert_eq!(
            setup.rails_new_args(),
            vec![
                "-S",
                "rails",
                "new",
                "shop",
                "-m",
                "/opt/torquebox/share/rails/template.rb",
                "-b",
                "/opt/torquebox/share/rails/openshift_app_builder.rb",
                "--skip-bundle",
            ]
        );
    }

    #[test]
    fn test_stageable_entries_skip_tool_and_scratch_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("shop");
        for sub in ["app", "config", "tmp", ".bundle", ".git", ".openshift"] {
            fs::create_dir_all(app.join(sub)).unwrap();
        }
        fs::write(app.join("Gemfile"), "").unwrap();
        fs::write(app.join("java-to-ruby"), "").unwrap();
        fs::write(app.join("app/nested.rb"), "").unwrap();

        let setup = RailsSetup::new(&app, Path::new("/opt/torquebox"), "java-to-ruby").unwrap();
        let entries = setup.stageable_entries().unwrap();

        assert_eq!(
            entries,
            vec![
                PathBuf::from(".openshift"),
                PathBuf::from("Gemfile"),
                PathBuf::from("app"),
                PathBuf::from("config"),
            ]
        );
    }
}

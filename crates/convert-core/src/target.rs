//! Target configuration trait for converter binaries
//!
//! This trait defines the interface a conversion target (e.g. TorqueBox on
//! OpenShift) must implement to drive the conversion pipeline.

use crate::config::ExtensionSet;
use crate::templates::Template;
use std::path::Path;

/// Configuration trait for conversion targets
///
/// Each target implements this trait to define:
/// - The banner shown while converting
/// - The extensions injected into `standalone.xml`
/// - The build script and web entrypoint payloads
/// - Version-control and Rails bootstrap details
///
/// Paths are relative to the application root. The defaults describe the
/// layout of an OpenShift JBoss AS7 application.
pub trait TargetConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Extensions and subsystems added to the server configuration
    fn extension_set(&self) -> ExtensionSet;

    /// Build hook written on every run
    fn build_script(&self) -> Template;

    /// Web entrypoint written only when missing
    fn web_entry(&self) -> Template;

    /// Name appended to `.gitignore` so the converter itself is never committed
    fn ignore_entry(&self) -> String;

    /// Commit message for the conversion commit
    fn commit_message(&self) -> &'static str;

    /// Environment variable pointing at the local TorqueBox install
    fn home_env(&self) -> &'static str;

    /// Oldest local JRuby that matches the version pinned in the build script
    fn min_jruby_version(&self) -> &'static str;

    /// Generate the "next steps" instructions after conversion
    fn next_steps(&self, root: &Path, rails_app: bool) -> Vec<String>;

    /// Server configuration rewritten by the converter
    fn standalone_xml(&self) -> &'static str {
        ".openshift/config/standalone.xml"
    }

    /// Java build files and directories removed before conversion
    fn java_artifacts(&self) -> &'static [&'static str] {
        &["pom.xml", "src", "deployments"]
    }

    /// Directory the build hook symlinks server modules into
    fn modules_dir(&self) -> &'static str {
        ".openshift/config/modules"
    }

    /// Ignore list updated with [`TargetConfig::ignore_entry`]
    fn ignore_file(&self) -> &'static str {
        ".gitignore"
    }

    /// Paths staged for the conversion commit
    fn staged_paths(&self) -> Vec<&'static str> {
        vec![".openshift/", self.web_entry().path]
    }
}

//! TorqueBox additions to the JBoss `standalone.xml` server configuration
//!
//! The rewrite is guarded by a marker extension: once the first module of the
//! [`ExtensionSet`] is registered under `<extensions>`, the document counts as
//! converted and is never touched again.

use crate::xml::{self, Document, NodeId, XmlError};
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation used when the document is written back
pub const INDENT: usize = 4;

/// The extensions and subsystems injected into every converted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    /// Dotted prefix shared by every extension module
    pub module_prefix: &'static str,
    /// Module suffixes, in insertion order. The first one doubles as the
    /// idempotence marker.
    pub modules: &'static [&'static str],
    /// Subsystem namespace with a `{module}` placeholder
    pub subsystem_namespace: &'static str,
    /// Namespace of the subsystem holding the deployment scanner
    pub scanner_namespace: &'static str,
    /// Deployment timeout written to every scanner, in milliseconds
    pub deployment_timeout: u32,
}

impl ExtensionSet {
    pub fn torquebox() -> Self {
        Self {
            module_prefix: "org.torquebox",
            modules: &["bootstrap", "core", "cdi", "jobs", "security", "services", "web"],
            subsystem_namespace: "urn:jboss:domain:torquebox-{module}:1.0",
            scanner_namespace: "urn:jboss:domain:deployment-scanner:1.0",
            deployment_timeout: 1200,
        }
    }

    /// Full module identifier, e.g. `org.torquebox.web`
    pub fn module_name(&self, module: &str) -> String {
        format!("{}.{}", self.module_prefix, module)
    }

    /// Subsystem namespace for one module
    pub fn namespace_for(&self, module: &str) -> String {
        self.subsystem_namespace.replace("{module}", module)
    }

    /// Module identifier whose presence marks a converted document
    pub fn sentinel(&self) -> Option<String> {
        self.modules.first().map(|module| self.module_name(module))
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::torquebox()
    }
}

/// What a transform did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    /// The marker extension was already present; nothing changed.
    AlreadyConverted,
    Mutated {
        extensions_added: usize,
        profiles_updated: usize,
    },
}

/// A required element is missing from the document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("extension set has no modules")]
    EmptyExtensionSet,

    #[error("root element <{root}> has no <extensions> child")]
    MissingExtensions { root: String },

    #[error("profile {profile} has no subsystem with xmlns=\"{namespace}\"")]
    MissingScannerSubsystem { profile: String, namespace: String },

    #[error("deployment scanner subsystem of profile {profile} has no <deployment-scanner> element")]
    MissingScanner { profile: String },
}

/// Errors from [`transform_file`]
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },

    #[error("unexpected structure in {}", path.display())]
    Structural {
        path: PathBuf,
        #[source]
        source: StructuralError,
    },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Apply `set` to the document at `path`, rewriting the file only when it
/// changed.
///
/// Nothing is written when parsing or any structural lookup fails. The
/// rewrite truncates the file in place; there is no temp-file swap.
pub fn transform_file(path: &Path, set: &ExtensionSet) -> Result<TransformOutcome, TransformError> {
    let input = fs::read_to_string(path).map_err(|source| TransformError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = xml::parse(&input).map_err(|source| TransformError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let outcome = apply_extension_set(&mut doc, set).map_err(|source| TransformError::Structural {
        path: path.to_path_buf(),
        source,
    })?;

    if let TransformOutcome::Mutated { .. } = outcome {
        fs::write(path, xml::to_string_pretty(&doc, INDENT)).map_err(|source| {
            TransformError::Io {
                action: "write",
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok(outcome)
}

/// Inject `set` into an in-memory document
///
/// Every lookup runs before the first mutation, so an error leaves `doc`
/// exactly as it was.
pub fn apply_extension_set(
    doc: &mut Document,
    set: &ExtensionSet,
) -> Result<TransformOutcome, StructuralError> {
    let sentinel = set.sentinel().ok_or(StructuralError::EmptyExtensionSet)?;
    let extensions = extensions_container(doc)?;

    if is_converted(doc, extensions, &sentinel) {
        return Ok(TransformOutcome::AlreadyConverted);
    }

    let profiles = doc.elements_named("profile");
    let scanners = profiles
        .iter()
        .enumerate()
        .map(|(index, profile)| deployment_scanner(doc, *profile, index, set))
        .collect::<Result<Vec<_>, _>>()?;

    for module in set.modules {
        let name = set.module_name(module);
        doc.append_element(extensions, "extension", &[("module", name.as_str())]);
    }

    let timeout = set.deployment_timeout.to_string();
    for (profile, scanner) in profiles.iter().zip(scanners) {
        for module in set.modules {
            let namespace = set.namespace_for(module);
            doc.append_element(*profile, "subsystem", &[("xmlns", namespace.as_str())]);
        }
        doc.set_attribute(scanner, "deployment-timeout", timeout.as_str());
    }

    Ok(TransformOutcome::Mutated {
        extensions_added: set.modules.len(),
        profiles_updated: profiles.len(),
    })
}

/// First `<extensions>` element directly under the root
pub fn extensions_container(doc: &Document) -> Result<NodeId, StructuralError> {
    doc.first_child_named(doc.root(), "extensions")
        .ok_or_else(|| StructuralError::MissingExtensions {
            root: doc.name(doc.root()).unwrap_or_default().to_string(),
        })
}

/// Whether any child of the extensions container carries the marker module
pub fn is_converted(doc: &Document, extensions: NodeId, sentinel: &str) -> bool {
    doc.child_elements(extensions)
        .any(|child| doc.attribute(child, "module") == Some(sentinel))
}

/// The `<deployment-scanner>` element of a profile's scanner subsystem
fn deployment_scanner(
    doc: &Document,
    profile: NodeId,
    index: usize,
    set: &ExtensionSet,
) -> Result<NodeId, StructuralError> {
    let label = match doc.attribute(profile, "name") {
        Some(name) => format!("'{}'", name),
        None => format!("#{}", index + 1),
    };

    let subsystem = doc
        .child_elements(profile)
        .find(|child| {
            doc.name(*child) == Some("subsystem")
                && doc.attribute(*child, "xmlns") == Some(set.scanner_namespace)
        })
        .ok_or_else(|| StructuralError::MissingScannerSubsystem {
            profile: label.clone(),
            namespace: set.scanner_namespace.to_string(),
        })?;

    doc.first_child_named(subsystem, "deployment-scanner")
        .ok_or(StructuralError::MissingScanner { profile: label })
}

//! Convert Core - Shared library for converting JBoss AS7 applications to TorqueBox
//!
//! This library turns the Java scaffold produced by an OpenShift JBoss
//! cartridge into a Ruby/JRuby application served by TorqueBox. It is driven
//! by a [`TargetConfig`] supplied by the binary, so the TorqueBox specifics
//! (module names, payloads, commit messages) live outside the library.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - XML tree, `standalone.xml` transformer,
//!   file cleanup, payload emission, ignore list, subprocess execution
//! - **Layer 2: Workflow Collaborators** - `TargetConfig` trait, git and Rails steps
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based pipeline (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based conversion pipeline
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use convert_core::config::{transform_file, ExtensionSet, TransformOutcome};
//!
//! let path = std::path::Path::new(".openshift/config/standalone.xml");
//! match transform_file(path, &ExtensionSet::torquebox())? {
//!     TransformOutcome::AlreadyConverted => println!("nothing to do"),
//!     TransformOutcome::Mutated { extensions_added, .. } => {
//!         println!("added {} extensions", extensions_added)
//!     }
//! }
//! ```

pub mod cleanup;
pub mod config;
pub mod ignore_list;
pub mod rails;
pub mod runtime;
pub mod target;
pub mod templates;
pub mod vcs;
pub mod xml;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{transform_file, ExtensionSet, TransformError, TransformOutcome};
pub use runtime::{check_runtimes, RuntimeInfo, Tool};
pub use target::TargetConfig;
pub use templates::{Template, WritePolicy};

#[cfg(feature = "tui")]
pub use tui::run;

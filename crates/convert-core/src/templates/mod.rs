//! Static payloads written into the converted application
//!
//! This module provides:
//! - The [`Template`] description of a payload and where it goes
//! - Writing payloads with an always/if-absent policy

pub mod emitter;

pub use emitter::{emit_template, emit_templates, Emitted};

/// When a payload may be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Regenerate on every run
    Always,
    /// Leave an existing (possibly user-edited) file alone
    IfAbsent,
}

/// A fixed file payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Destination relative to the application root
    pub path: &'static str,

    pub contents: &'static str,

    pub policy: WritePolicy,

    /// Mark the file executable (Unix only)
    pub executable: bool,
}

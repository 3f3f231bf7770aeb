//! Minimal XML document model for server configuration files
//!
//! This module provides:
//! - An owned arena tree ([`Document`]) with pure lookup helpers
//! - A parser built on quick-xml events
//! - An indented serializer

pub mod document;
pub mod parse;
pub mod write;

pub use document::{Attribute, Document, Element, Node, NodeId};
pub use parse::parse;
pub use write::to_string_pretty;

/// Reasons a document is not well-formed
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("{message} (at byte {position})")]
    Syntax { message: String, position: u64 },

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text found outside the root element")]
    StrayText,

    #[error("element <{0}> is never closed")]
    Unclosed(String),
}

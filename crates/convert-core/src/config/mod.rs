//! Server configuration rewriting

pub mod standalone;

pub use standalone::{
    apply_extension_set, transform_file, ExtensionSet, StructuralError, TransformError,
    TransformOutcome,
};

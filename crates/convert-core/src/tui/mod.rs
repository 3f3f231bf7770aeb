//! Console front end using cliclack
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod pipeline;

#[cfg(feature = "tui")]
pub use pipeline::{run, run_in, ConvertArgs};

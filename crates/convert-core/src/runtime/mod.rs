//! External tool detection and execution
//!
//! This module provides:
//! - Tool detection (Git, JRuby, Bundler)
//! - Subprocess execution with line-by-line output
//! - Version comparison against the deployed runtime

pub mod check;
pub mod process;
pub mod version;

pub use check::{check_runtimes, check_runtimes_with_advisory, check_tool, RuntimeInfo, Tool};
pub use process::run_streaming;

//! Tooling & Integration Layer
//!
//! The `catalog` command-line interface and its output formatting.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};

//! CLI layer for credentialforge.
//!
//! Provides the command-line interface using clap, with commands for
//! generating synthetic documents, validating embedded credentials, and
//! managing the pattern database.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};

//! CLI module for roster
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Load configuration and run the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{build_state, init, run, run_command, serve};
pub use errors::{CliError, CliResult};

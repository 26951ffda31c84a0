//! Command-line interface for library-migrator.
//!
//! This module provides one subcommand per migration mode plus a `config`
//! command for inspecting the effective settings.

mod commands;

pub use commands::{Cli, Commands, run_command};

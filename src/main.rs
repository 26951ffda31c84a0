//! Library Migrator - moves a music library export into Spotify.
//!
//! Playlists are recreated as private playlists, library albums become saved
//! albums and playlist tracks can be added to liked songs. Anything that
//! cannot be matched is written to a failure log for manual follow-up.

pub mod cli;
pub mod config;
pub mod destination;
pub mod error;
pub mod migration;
pub mod source;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("library_migrator=info".parse()?))
        .init();

    cli::run_command(&args)
}

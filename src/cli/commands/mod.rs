//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `migrate`: Playlist, saved album and liked track migration
//! - `settings`: Show or persist the effective configuration

mod migrate;
mod settings;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::migration::RunMode;

pub use migrate::cmd_migrate;
pub use settings::cmd_config;

/// Library Migrator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that override the config file for this run
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Library export (JSON) to migrate from
    #[arg(long, global = true)]
    pub export: Option<PathBuf>,

    /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
    #[arg(long, global = true, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Spotify user id (or set SPOTIFY_USER_ID env var)
    #[arg(long, global = true, env = "SPOTIFY_USER_ID")]
    pub user: Option<String>,

    /// Resolved items per append request (1-100, saved items cap at 50)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub batch_size: Option<u16>,
}

impl Overrides {
    /// Apply the overrides on top of a loaded config
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(export) = &self.export {
            config.migration.source_export = Some(export.clone());
        }
        if let Some(token) = &self.token {
            config.credentials.spotify_access_token = Some(token.clone());
        }
        if let Some(user) = &self.user {
            config.credentials.spotify_user_id = Some(user.clone());
        }
        if let Some(batch_size) = self.batch_size {
            config.migration.append_batch_size = usize::from(batch_size);
        }
        config
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recreate playlists as private Spotify playlists
    Playlists {
        /// Only migrate playlists whose name contains this text
        filter: Option<String>,
    },
    /// Add every library album to saved albums
    Albums,
    /// Add the tracks of matching playlists to saved tracks
    Liked {
        /// Only use playlists whose name contains this text
        filter: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration back to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let file_config = config::load();
    let config = cli.overrides.apply(file_config.clone());

    match &cli.command {
        Commands::Playlists { filter } => {
            let rt = Runtime::new()?;
            cmd_migrate(&rt, &config, RunMode::Playlists, filter.as_deref())
        }
        Commands::Albums => {
            let rt = Runtime::new()?;
            cmd_migrate(&rt, &config, RunMode::Albums, None)
        }
        Commands::Liked { filter } => {
            let rt = Runtime::new()?;
            cmd_migrate(&rt, &config, RunMode::Liked, filter.as_deref())
        }
        Commands::Config { save } => cmd_config(&config, &file_config, *save),
    }
}

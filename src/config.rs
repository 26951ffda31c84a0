//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\library-migrator\config.toml
//! - macOS: ~/Library/Application Support/library-migrator/config.toml
//! - Linux: ~/.config/library-migrator/config.toml
//!
//! The config file is human-readable and editable. Command-line flags and
//! environment variables override it for a single run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::migration::RunMode;
use crate::migration::query::DEFAULT_VARIOUS_ARTISTS_SENTINEL;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Migration settings
    pub migration: MigrationConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Spotify user access token
    pub spotify_access_token: Option<String>,

    /// Spotify user id that owns created playlists
    pub spotify_user_id: Option<String>,
}

/// Migration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Library export to migrate from
    pub source_export: Option<PathBuf>,

    /// Album artists containing this (case-insensitive) are not used in queries
    pub various_artists_sentinel: String,

    /// Resolved items buffered per append request (1 = append immediately)
    pub append_batch_size: usize,

    /// Failure log for playlist runs
    pub track_failure_log: PathBuf,

    /// Failure log for saved album runs
    pub album_failure_log: PathBuf,

    /// Failure log for liked track runs
    pub liked_failure_log: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_export: None,
            various_artists_sentinel: DEFAULT_VARIOUS_ARTISTS_SENTINEL.to_string(),
            append_batch_size: 1,
            track_failure_log: PathBuf::from("errored-tracks.log"),
            album_failure_log: PathBuf::from("errored-albums.log"),
            liked_failure_log: PathBuf::from("errored-tracks_thumbs-up.log"),
        }
    }
}

impl MigrationConfig {
    /// Failure log used by the given run mode
    pub fn failure_log_for(&self, mode: RunMode) -> &Path {
        match mode {
            RunMode::Playlists => &self.track_failure_log,
            RunMode::Albums => &self.album_failure_log,
            RunMode::Liked => &self.liked_failure_log,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("library-migrator"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, falling back to defaults
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

// ============================================================================
// Tests
// ============================================================================

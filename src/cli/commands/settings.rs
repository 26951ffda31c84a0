//! Configuration inspection command.

use crate::config::{self, Config};

/// Print the effective configuration, optionally saving it
///
/// Saving never stores an access token given through `--token` or
/// `SPOTIFY_ACCESS_TOKEN`. Only a token already in the file is kept, and it
/// is stored in plaintext.
pub fn cmd_config(config: &Config, file_config: &Config, save: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: <no config directory>"),
    }
    println!();
    println!("{}", render(config)?);

    if save {
        let path = config::save(&persisted(config, file_config))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

/// The config to write back: the effective settings with the file's own token
fn persisted(config: &Config, file_config: &Config) -> Config {
    let mut saved = config.clone();
    saved.credentials.spotify_access_token = file_config.credentials.spotify_access_token.clone();
    saved
}

/// Render the config as TOML with the access token masked
fn render(config: &Config) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if let Some(token) = shown.credentials.spotify_access_token.as_mut() {
        *token = mask(token);
    }
    Ok(toml::to_string_pretty(&shown)?)
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

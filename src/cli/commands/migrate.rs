//! Migration commands for playlists, saved albums and liked tracks.

use tokio::runtime::Runtime;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::destination::SpotifyClient;
use crate::error::{Error, ResultExt};
use crate::migration::{
    DestinationCatalog, EntityKind, FailureRecorder, MigrationOptions, MigrationPipeline, RunMode,
    RunSummary, SourceCatalog,
};
use crate::source::LibraryExport;

/// Migrate the configured library export into Spotify
pub fn cmd_migrate(
    rt: &Runtime,
    config: &Config,
    mode: RunMode,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let credentials = &config.credentials;
    let settings = &config.migration;

    let token = credentials
        .spotify_access_token
        .as_deref()
        .ok_or(ConfigError::Missing("spotify_access_token (--token or SPOTIFY_ACCESS_TOKEN)"))?;
    let user = credentials
        .spotify_user_id
        .as_deref()
        .ok_or(ConfigError::Missing("spotify_user_id (--user or SPOTIFY_USER_ID)"))?;
    let export_path = settings
        .source_export
        .as_deref()
        .ok_or(ConfigError::Missing("source_export (--export)"))?;

    let export = LibraryExport::load(export_path)?;
    let spotify = SpotifyClient::new(token, user).with_context("setting up Spotify client")?;

    let log_path = settings.failure_log_for(mode);
    let recorder = FailureRecorder::open_append(log_path)
        .with_context(format!("opening failure log {}", log_path.display()))?;

    let options = MigrationOptions {
        various_artists_sentinel: settings.various_artists_sentinel.clone(),
        append_batch_size: settings.append_batch_size,
    };

    println!("Migrating {} from {:?}", describe(mode), export.path());
    println!();

    rt.block_on(migrate(&export, &spotify, &recorder, options, mode, filter))
}

/// Run the pipeline and report the outcome
async fn migrate(
    source: &dyn SourceCatalog,
    destination: &dyn DestinationCatalog,
    recorder: &FailureRecorder,
    options: MigrationOptions,
    mode: RunMode,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let pipeline = MigrationPipeline::new(source, destination, recorder, options);
    let log = recorder
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "the failure log".to_string());

    let summary = match pipeline.run(mode, filter).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Please check {} for missing tracks", log);
            return Err(Error::from(e).into());
        }
    };

    print_summary(&summary, mode);
    info!("{} failure(s) written to {}", recorder.recorded(), log);

    println!("Finished");
    println!("Please check {} for missing tracks", log);

    if !summary.is_success() {
        let names: Vec<&str> = summary
            .failed_collections()
            .map(|c| c.name.as_str())
            .collect();
        return Err(Error::collections_failed(&names).into());
    }
    Ok(())
}

fn describe(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Playlists => "playlists",
        RunMode::Albums => "saved albums",
        RunMode::Liked => "liked tracks",
    }
}

fn print_summary(summary: &RunSummary, mode: RunMode) {
    let noun = match mode.entity_kind() {
        EntityKind::Track => "tracks",
        EntityKind::Album => "albums",
    };

    for collection in &summary.collections {
        println!(
            "  {:<40} {:>5}/{:<5} added  {:>5} failed  ({:?})",
            collection.name,
            collection.appended,
            collection.total,
            collection.failed,
            collection.state
        );
    }
    println!();
    println!(
        "{} {} added, {} failed across {} collection(s)",
        summary.appended(),
        noun,
        summary.failed(),
        summary.collections.len()
    );
}

//! Migration pipeline - orchestrates the per-collection, per-entity flow
//!
//! For each source collection:
//! 1. Open the destination collection (new playlist or saved bucket)
//! 2. For each entity, in source order: build query → resolve → append
//! 3. Route every per-item failure to the failure log and keep going
//!
//! Per-collection states: `Pending → Creating → InProgress → Done`, or
//! `Failed` when the destination collection can't be created.

use std::collections::HashMap;

use super::assembler::{AppendResult, CollectionAssembler, DestinationAction, DestinationCollection};
use super::domain::{
    EntityKind, FailureReason, FailureRecord, MatchResult, MigrationError, SourceCollection,
    SourceEntity,
};
use super::query::{DEFAULT_VARIOUS_ARTISTS_SENTINEL, QueryBuilder};
use super::recorder::FailureRecorder;
use super::resolver::MatchResolver;
use super::traits::{DestinationCatalog, SourceCatalog};

/// Name of the pseudo-collection holding every saved album
pub const SAVED_ALBUMS_COLLECTION: &str = "Saved albums";

/// What gets migrated, and where it goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Playlists become new private playlists
    Playlists,
    /// Library albums become saved albums
    Albums,
    /// Tracks of matching playlists become saved tracks
    Liked,
}

impl RunMode {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            RunMode::Playlists | RunMode::Liked => EntityKind::Track,
            RunMode::Albums => EntityKind::Album,
        }
    }

    pub fn action(self) -> DestinationAction {
        match self {
            RunMode::Playlists => DestinationAction::CreatePlaylist,
            RunMode::Albums => DestinationAction::SaveAlbums,
            RunMode::Liked => DestinationAction::SaveTracks,
        }
    }
}

/// Tunables for a run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Case-insensitive marker for compilation album artists
    pub various_artists_sentinel: String,
    /// Items per append call (1 = append one at a time)
    pub append_batch_size: usize,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            various_artists_sentinel: DEFAULT_VARIOUS_ARTISTS_SENTINEL.to_string(),
            append_batch_size: 1,
        }
    }
}

/// Processing state of one source collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    Pending,
    Creating,
    InProgress,
    Done,
    Failed,
}

/// Outcome of migrating one collection
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub name: String,
    /// Entities in the source collection
    pub total: usize,
    pub appended: usize,
    /// Entities written to the failure log
    pub failed: usize,
    pub state: CollectionState,
}

impl CollectionReport {
    fn new(name: &str, total: usize) -> Self {
        Self {
            name: name.to_string(),
            total,
            appended: 0,
            failed: 0,
            state: CollectionState::Pending,
        }
    }

    fn transition(&mut self, next: CollectionState) {
        tracing::debug!("{}: {:?} -> {:?}", self.name, self.state, next);
        self.state = next;
    }

    /// Entities that reached a terminal outcome
    pub fn processed(&self) -> usize {
        self.appended + self.failed
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub collections: Vec<CollectionReport>,
}

impl RunSummary {
    pub fn appended(&self) -> usize {
        self.collections.iter().map(|c| c.appended).sum()
    }

    pub fn failed(&self) -> usize {
        self.collections.iter().map(|c| c.failed).sum()
    }

    pub fn processed(&self) -> usize {
        self.collections.iter().map(CollectionReport::processed).sum()
    }

    pub fn failed_collections(&self) -> impl Iterator<Item = &CollectionReport> {
        self.collections
            .iter()
            .filter(|c| c.state == CollectionState::Failed)
    }

    /// True when every collection reached `Done`
    pub fn is_success(&self) -> bool {
        self.failed_collections().next().is_none()
    }
}

/// Runs a migration from a source catalog into a destination catalog
pub struct MigrationPipeline<'a> {
    source: &'a dyn SourceCatalog,
    destination: &'a dyn DestinationCatalog,
    recorder: &'a FailureRecorder,
    options: MigrationOptions,
}

impl<'a> MigrationPipeline<'a> {
    pub fn new(
        source: &'a dyn SourceCatalog,
        destination: &'a dyn DestinationCatalog,
        recorder: &'a FailureRecorder,
        options: MigrationOptions,
    ) -> Self {
        Self {
            source,
            destination,
            recorder,
            options,
        }
    }

    /// Migrate every collection selected by `mode` and `filter`.
    ///
    /// `filter` keeps only collections whose name contains it. Per-item and
    /// per-collection failures are logged and counted. Only an unexpected
    /// destination error aborts the run.
    pub async fn run(
        &self,
        mode: RunMode,
        filter: Option<&str>,
    ) -> Result<RunSummary, MigrationError> {
        let collections = self.load_collections(mode, filter).await?;
        tracing::info!("Migrating {} collection(s)", collections.len());

        let query_builder = QueryBuilder::new(self.options.various_artists_sentinel.as_str());
        let resolver = MatchResolver::new(self.destination);
        let mut assembler =
            CollectionAssembler::new(self.destination, mode.action(), self.options.append_batch_size);

        let mut summary = RunSummary::default();
        for collection in &collections {
            let report = self
                .migrate_collection(collection, &query_builder, &resolver, &mut assembler)
                .await?;
            tracing::info!(
                "{}: {} added, {} failed",
                report.name,
                report.appended,
                report.failed
            );
            summary.collections.push(report);
        }

        Ok(summary)
    }

    async fn load_collections(
        &self,
        mode: RunMode,
        filter: Option<&str>,
    ) -> Result<Vec<SourceCollection>, MigrationError> {
        if mode == RunMode::Albums {
            if let Some(filter) = filter {
                tracing::warn!("Ignoring filter '{}': albums are one collection", filter);
            }
            tracing::info!("Getting all albums");
            let albums = self.source.list_albums().await?;
            return Ok(vec![SourceCollection::new(SAVED_ALBUMS_COLLECTION, albums)]);
        }

        tracing::info!("Getting all playlists");
        let mut collections = self.source.list_collections().await?;
        if let Some(filter) = filter {
            collections.retain(|c| c.name.contains(filter));
            tracing::info!("{} playlist(s) match '{}'", collections.len(), filter);
        }

        if collections
            .iter()
            .flat_map(|c| &c.entities)
            .any(SourceEntity::is_incomplete)
        {
            tracing::info!("Getting all songs");
            let library: HashMap<String, SourceEntity> = self
                .source
                .list_all_entities()
                .await?
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect();
            for entity in collections.iter_mut().flat_map(|c| c.entities.iter_mut()) {
                if let Some(known) = library.get(&entity.id) {
                    entity.merge(known);
                }
            }
        }

        Ok(collections)
    }

    async fn migrate_collection(
        &self,
        collection: &SourceCollection,
        query_builder: &QueryBuilder,
        resolver: &MatchResolver<'_>,
        assembler: &mut CollectionAssembler<'_>,
    ) -> Result<CollectionReport, MigrationError> {
        let name = collection.name.as_str();
        let mut report = CollectionReport::new(name, collection.entities.len());

        report.transition(CollectionState::Creating);
        let destination = match assembler.open(name).await {
            Ok(destination) => destination,
            Err(e) => {
                tracing::error!("Could not create destination for {}, skipping it: {}", name, e);
                self.recorder
                    .record(&FailureRecord::for_collection(name, FailureReason::CollectionUnavailable));
                report.transition(CollectionState::Failed);
                return Ok(report);
            }
        };

        report.transition(CollectionState::InProgress);
        tracing::info!("Adding {} item(s) to {}", collection.entities.len(), name);

        for entity in &collection.entities {
            let query = match query_builder.build(entity) {
                Ok(query) => query,
                Err(reason) => {
                    tracing::info!("{} has no usable metadata, probably uploaded. Skipping", entity.id);
                    self.fail(&mut report, entity, reason.into());
                    continue;
                }
            };

            match resolver.resolve(&query).await {
                Ok(MatchResult::Resolved { destination_id }) => {
                    let result = assembler
                        .append(&destination, entity.clone(), destination_id)
                        .await;
                    self.apply(&mut report, result);
                }
                Ok(MatchResult::Unresolved { reason }) => {
                    self.fail(&mut report, entity, reason.into());
                }
                Err(source) => {
                    tracing::error!("Unexpected destination error in {}: {}", name, source);
                    self.finish(&mut report, assembler, &destination).await;
                    return Err(MigrationError::Fatal {
                        collection: name.to_string(),
                        source,
                    });
                }
            }
        }

        self.finish(&mut report, assembler, &destination).await;
        report.transition(CollectionState::Done);
        Ok(report)
    }

    /// Flush buffered appends so every resolved entity gets an outcome
    async fn finish(
        &self,
        report: &mut CollectionReport,
        assembler: &mut CollectionAssembler<'_>,
        destination: &DestinationCollection,
    ) {
        let result = assembler.finish(destination).await;
        self.apply(report, result);
    }

    fn apply(&self, report: &mut CollectionReport, result: AppendResult) {
        report.appended += result.appended.len();
        for failure in result.failed {
            tracing::warn!("Could not add {}: {}", failure.entity.id, failure.error);
            self.fail(report, &failure.entity, FailureReason::AppendFailed);
        }
    }

    fn fail(&self, report: &mut CollectionReport, entity: &SourceEntity, reason: FailureReason) {
        report.failed += 1;
        self.recorder
            .record(&FailureRecord::for_entity(&report.name, entity, reason));
    }
}


/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::migration::domain::DestinationError;
    use crate::migration::recorder::testing::SharedBuffer;
    use crate::migration::traits::mocks::{MockDestination, MockSource};
    use proptest::prelude::*;

    /// What the destination does with one generated entity
    #[derive(Debug, Clone, Copy)]
    enum Fate {
        Hit,
        Miss,
        NoArtist,
        Transient,
    }

    fn arbitrary_fates() -> impl Strategy<Value = Vec<Fate>> {
        prop::collection::vec(
            prop_oneof![
                Just(Fate::Hit),
                Just(Fate::Miss),
                Just(Fate::NoArtist),
                Just(Fate::Transient),
            ],
            0..25,
        )
    }

    fn scenario(fates: &[Fate]) -> (MockSource, MockDestination) {
        let mut dest = MockDestination::new();
        let mut entities = Vec::new();
        for (i, fate) in fates.iter().enumerate() {
            let title = format!("Song {i}");
            let artist = format!("Artist {i}");
            let query = format!("{artist} {title}");
            match fate {
                Fate::Hit => dest = dest.with_hit(&query, &format!("spotify:track:{i}")),
                Fate::Transient => dest = dest.with_search_error(&query, DestinationError::RateLimited),
                Fate::Miss | Fate::NoArtist => {}
            }
            let artist = match fate {
                Fate::NoArtist => None,
                _ => Some(artist.as_str()),
            };
            entities.push(SourceEntity::track(format!("t{i}"), Some(title.as_str()), artist));
        }
        let source = MockSource {
            collections: vec![SourceCollection::new("Generated", entities)],
            ..Default::default()
        };
        (source, dest)
    }

    fn run(fates: &[Fate], batch: usize) -> (RunSummary, MockDestination, SharedBuffer) {
        let (source, dest) = scenario(fates);
        let buffer = SharedBuffer::default();
        let recorder = FailureRecorder::from_writer(buffer.clone());
        let options = MigrationOptions {
            append_batch_size: batch,
            ..Default::default()
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let summary = runtime
            .block_on(MigrationPipeline::new(&source, &dest, &recorder, options).run(RunMode::Playlists, None))
            .unwrap();
        (summary, dest, buffer)
    }

    proptest! {
        /// Every entity is either appended or logged, never both or neither
        #[test]
        fn total_accounting(fates in arbitrary_fates(), batch in 1usize..6) {
            let (summary, dest, log) = run(&fates, batch);
            let appended = dest.stored_ids().len();
            prop_assert_eq!(appended + log.lines().len(), fates.len());
            prop_assert_eq!(summary.processed(), fates.len());
        }

        /// Appended ids follow source order, skipping failures
        #[test]
        fn order_preserved(fates in arbitrary_fates(), batch in 1usize..6) {
            let (_, dest, _) = run(&fates, batch);
            let expected: Vec<String> = fates
                .iter()
                .enumerate()
                .filter(|(_, f)| matches!(f, Fate::Hit))
                .map(|(i, _)| i.to_string())
                .collect();
            let actual: Vec<String> = dest.stored_ids().iter().map(|id| id.bare_id().to_string()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}

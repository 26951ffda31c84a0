//! Destination collection creation and ordered appends.

use super::domain::{DestinationError, DestinationId, EntityKind, SourceEntity, Visibility};
use super::traits::DestinationCatalog;

/// Largest batch the destination accepts in one append call
pub const MAX_BATCH_SIZE: usize = 100;

/// Largest batch the destination accepts in one saved-items call
pub const MAX_SAVE_BATCH_SIZE: usize = 50;

/// Where resolved items end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationAction {
    /// A fresh private playlist per source collection
    CreatePlaylist,
    /// The user's saved tracks ("liked songs")
    SaveTracks,
    /// The user's saved albums
    SaveAlbums,
}

impl DestinationAction {
    /// Items per destination request, so one flush is exactly one call
    pub fn max_batch_size(self) -> usize {
        match self {
            DestinationAction::CreatePlaylist => MAX_BATCH_SIZE,
            DestinationAction::SaveTracks | DestinationAction::SaveAlbums => MAX_SAVE_BATCH_SIZE,
        }
    }
}

/// An open destination collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationCollection {
    Playlist { id: String, name: String },
    SavedItems { kind: EntityKind },
}

/// An entity whose append call failed
#[derive(Debug, Clone)]
pub struct AppendFailure {
    pub entity: SourceEntity,
    pub error: DestinationError,
}

/// Outcome of the appends flushed by one call
#[derive(Debug, Default)]
pub struct AppendResult {
    /// Entities confirmed appended, in order
    pub appended: Vec<SourceEntity>,
    pub failed: Vec<AppendFailure>,
}

impl AppendResult {
    fn extend(&mut self, other: AppendResult) {
        self.appended.extend(other.appended);
        self.failed.extend(other.failed);
    }
}

/// Creates destination collections and appends resolved items in source order.
///
/// Items are buffered until `batch_size` is reached. Batches go out
/// sequentially, so destination order matches source order.
pub struct CollectionAssembler<'a> {
    destination: &'a dyn DestinationCatalog,
    action: DestinationAction,
    batch_size: usize,
    pending: Vec<(SourceEntity, DestinationId)>,
}

impl<'a> CollectionAssembler<'a> {
    pub fn new(
        destination: &'a dyn DestinationCatalog,
        action: DestinationAction,
        batch_size: usize,
    ) -> Self {
        let batch_size = batch_size.clamp(1, action.max_batch_size());
        Self {
            destination,
            action,
            batch_size,
            pending: Vec::with_capacity(batch_size),
        }
    }

    /// Open the destination collection for a source collection.
    ///
    /// Playlists are always created fresh, even if one with the same name
    /// exists. Saved-item buckets need no destination call.
    pub async fn open(&mut self, name: &str) -> Result<DestinationCollection, DestinationError> {
        match self.action {
            DestinationAction::CreatePlaylist => {
                let id = self
                    .destination
                    .create_collection(name, Visibility::Private)
                    .await?;
                tracing::info!("Playlist created: {} -- ID: {}", name, id);
                Ok(DestinationCollection::Playlist {
                    id,
                    name: name.to_string(),
                })
            }
            DestinationAction::SaveTracks => Ok(DestinationCollection::SavedItems {
                kind: EntityKind::Track,
            }),
            DestinationAction::SaveAlbums => Ok(DestinationCollection::SavedItems {
                kind: EntityKind::Album,
            }),
        }
    }

    /// Queue one resolved item, flushing when the batch is full
    pub async fn append(
        &mut self,
        collection: &DestinationCollection,
        entity: SourceEntity,
        destination_id: DestinationId,
    ) -> AppendResult {
        self.pending.push((entity, destination_id));
        if self.pending.len() >= self.batch_size {
            self.flush(collection).await
        } else {
            AppendResult::default()
        }
    }

    /// Flush whatever is still buffered
    pub async fn finish(&mut self, collection: &DestinationCollection) -> AppendResult {
        let mut result = AppendResult::default();
        while !self.pending.is_empty() {
            result.extend(self.flush(collection).await);
        }
        result
    }

    async fn flush(&mut self, collection: &DestinationCollection) -> AppendResult {
        let take = self.pending.len().min(self.batch_size);
        let batch: Vec<_> = self.pending.drain(..take).collect();
        let ids: Vec<DestinationId> = batch.iter().map(|(_, id)| id.clone()).collect();

        let outcome = match collection {
            DestinationCollection::Playlist { id, name } => {
                tracing::debug!("Appending {} item(s) to {}", ids.len(), name);
                self.destination.append_items(id, &ids).await
            }
            DestinationCollection::SavedItems { kind } => {
                tracing::debug!("Saving {} {}(s)", ids.len(), kind.as_search_type());
                self.destination.add_to_saved_items(*kind, &ids).await
            }
        };

        match outcome {
            Ok(()) => AppendResult {
                appended: batch.into_iter().map(|(entity, _)| entity).collect(),
                failed: vec![],
            },
            Err(error) => {
                tracing::warn!("Append of {} item(s) failed: {}", batch.len(), error);
                AppendResult {
                    appended: vec![],
                    failed: batch
                        .into_iter()
                        .map(|(entity, _)| AppendFailure {
                            entity,
                            error: error.clone(),
                        })
                        .collect(),
                }
            }
        }
    }
}

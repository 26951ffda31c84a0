//! Trait definitions for the source and destination catalogs.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`crate::source::LibraryExport`] and
//! [`crate::destination::spotify::SpotifyClient`], while tests substitute the
//! mock implementations below.
//!
//! # Example
//!
//! ```ignore
//! use library_migrator::migration::traits::DestinationCatalog;
//!
//! async fn first_hit<D: DestinationCatalog>(dest: &D, query: &Query) {
//!     let hits = dest.search(query, 1).await?;
//! }
//! ```

use async_trait::async_trait;

use super::domain::{
    DestinationError, DestinationId, EntityKind, Query, SourceCollection, SourceEntity,
    SourceError, Visibility,
};

/// Read access to the catalog being migrated from.
///
/// Entities that were deleted or are inaccessible yield no metadata
/// rather than an error.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// All user playlists, entries in playlist order.
    async fn list_collections(&self) -> Result<Vec<SourceCollection>, SourceError>;

    /// The flat library dump of tracks.
    async fn list_all_entities(&self) -> Result<Vec<SourceEntity>, SourceError>;

    /// Every album referenced by the library.
    async fn list_albums(&self) -> Result<Vec<SourceEntity>, SourceError>;
}

/// Write access to the catalog being migrated to.
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Search the catalog, returning candidate ids in rank order.
    async fn search(
        &self,
        query: &Query,
        limit: u32,
    ) -> Result<Vec<DestinationId>, DestinationError>;

    /// Create a new collection and return its id.
    async fn create_collection(
        &self,
        name: &str,
        visibility: Visibility,
    ) -> Result<String, DestinationError>;

    /// Append items to a collection, keeping their order.
    async fn append_items(
        &self,
        collection_id: &str,
        items: &[DestinationId],
    ) -> Result<(), DestinationError>;

    /// Add items to the user's saved tracks or saved albums.
    async fn add_to_saved_items(
        &self,
        kind: EntityKind,
        items: &[DestinationId],
    ) -> Result<(), DestinationError>;
}

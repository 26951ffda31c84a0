//! Internal domain models for the migration pipeline.
//!
//! These types are OUR types - they don't change when the export format or the
//! destination API changes. Source records and destination responses get
//! converted into these types via adapters.

use std::fmt;

/// Whether an entity is a single track or a whole album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Track,
    Album,
}

impl EntityKind {
    /// Name used by the destination search API's `type` parameter
    pub fn as_search_type(self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Album => "album",
        }
    }
}

/// A track or album as read from the source catalog.
///
/// Missing metadata is an explicit `None`. Uploaded tracks with no catalog
/// match and compilation albums routinely lack an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntity {
    /// Source-native identifier (opaque)
    pub id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub kind: EntityKind,
}

impl SourceEntity {
    pub fn track(id: impl Into<String>, title: Option<&str>, artist: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.map(String::from),
            artist: artist.map(String::from),
            kind: EntityKind::Track,
        }
    }

    pub fn album(id: impl Into<String>, title: Option<&str>, artist: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.map(String::from),
            artist: artist.map(String::from),
            kind: EntityKind::Album,
        }
    }

    /// True when the title or the artist is unknown
    pub fn is_incomplete(&self) -> bool {
        self.title.is_none() || self.artist.is_none()
    }

    /// Merge another record of the same entity into this one, preferring existing values
    pub fn merge(&mut self, other: &SourceEntity) {
        if self.title.is_none() {
            self.title = other.title.clone();
        }
        if self.artist.is_none() {
            self.artist = other.artist.clone();
        }
    }
}

/// A named, ordered grouping of entities (a playlist or the saved-albums dump)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCollection {
    pub name: String,
    pub entities: Vec<SourceEntity>,
}

impl SourceCollection {
    pub fn new(name: impl Into<String>, entities: Vec<SourceEntity>) -> Self {
        Self {
            name: name.into(),
            entities,
        }
    }
}

/// A normalized destination search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub kind: EntityKind,
}

/// Identifier of a matched item in the destination catalog.
///
/// Holds the full URI (e.g. `spotify:track:6l8GvAyoUZwWDgF1e4822w`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationId(pub String);

impl DestinationId {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_uri(&self) -> &str {
        &self.0
    }

    /// The last `:`-separated segment, for endpoints that take bare ids
    pub fn bare_id(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why an entity could not be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    NoSearchResults,
    MetadataMissing,
    DestinationError,
}

/// Terminal match outcome for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Resolved { destination_id: DestinationId },
    Unresolved { reason: UnresolvedReason },
}

/// Reason code written to the failure log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    MetadataMissing,
    NoSearchResults,
    DestinationError,
    AppendFailed,
    CollectionUnavailable,
}

impl FailureReason {
    pub fn code(self) -> &'static str {
        match self {
            FailureReason::MetadataMissing => "MetadataMissing",
            FailureReason::NoSearchResults => "NoSearchResults",
            FailureReason::DestinationError => "DestinationError",
            FailureReason::AppendFailed => "AppendFailed",
            FailureReason::CollectionUnavailable => "CollectionUnavailable",
        }
    }
}

impl From<UnresolvedReason> for FailureReason {
    fn from(reason: UnresolvedReason) -> Self {
        match reason {
            UnresolvedReason::NoSearchResults => FailureReason::NoSearchResults,
            UnresolvedReason::MetadataMissing => FailureReason::MetadataMissing,
            UnresolvedReason::DestinationError => FailureReason::DestinationError,
        }
    }
}

/// One line of the failure log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub collection_name: String,
    /// Source id, printed when the entity has no title or artist
    pub entity_id: Option<String>,
    pub entity_title: Option<String>,
    pub entity_artist: Option<String>,
    pub reason: FailureReason,
}

impl FailureRecord {
    pub fn for_entity(collection_name: &str, entity: &SourceEntity, reason: FailureReason) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            entity_id: Some(entity.id.clone()),
            entity_title: entity.title.clone(),
            entity_artist: entity.artist.clone(),
            reason,
        }
    }

    /// A record for a whole collection that could not be processed
    pub fn for_collection(collection_name: &str, reason: FailureReason) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            entity_id: None,
            entity_title: None,
            entity_artist: None,
            reason,
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection: {}", self.collection_name)?;
        if self.entity_title.is_some() || self.entity_artist.is_some() {
            write!(
                f,
                " -- {} - {}",
                self.entity_artist.as_deref().unwrap_or("<unknown artist>"),
                self.entity_title.as_deref().unwrap_or("<unknown title>")
            )?;
        } else if let Some(id) = &self.entity_id {
            write!(f, " -- id: {}", id)?;
        }
        write!(f, " [{}]", self.reason.code())
    }
}

/// Visibility of a newly created destination collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public,
}

/// Errors raised by the destination catalog.
///
/// `is_transient` splits them into per-item failures and run-fatal ones.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DestinationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Server error: HTTP {status}")]
    Server { status: u16 },

    #[error("API request failed: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl DestinationError {
    /// Rate limits, 5xx responses and network failures (including timeouts)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DestinationError::Network(_)
                | DestinationError::RateLimited
                | DestinationError::Server { .. }
        )
    }
}

/// Errors raised while reading the source catalog
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read library export {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid library export: {0}")]
    Parse(String),
}

/// Errors that abort a migration run
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Source catalog error: {0}")]
    Source(#[from] SourceError),

    #[error("Unrecoverable destination error in '{collection}': {source}")]
    Fatal {
        collection: String,
        #[source]
        source: DestinationError,
    },
}

//! Library export Data Transfer Objects
//!
//! These types match EXACTLY what the library export JSON contains.
//! Every field is optional or defaulted: exports of uploaded or deleted
//! items routinely omit keys.
//! DO NOT use these types outside the source module - convert to domain types.

use serde::{Deserialize, Serialize};

/// Top-level export document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    /// User playlists with their entries
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    /// Flat dump of every song in the library
    #[serde(default)]
    pub songs: Vec<Song>,
    /// Album info records, one per publicly available album
    #[serde(default)]
    pub albums: Vec<AlbumInfo>,
}

/// A user playlist
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Vec<PlaylistEntry>,
}

/// An entry in a playlist
///
/// `track` is only embedded for catalog tracks; library tracks carry just
/// their `trackId` and must be looked up in the songs dump.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub track_id: Option<String>,
    pub track: Option<Song>,
}

/// Song metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub album_id: Option<String>,
}

/// Album info record
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumInfo {
    pub album_id: Option<String>,
    pub name: Option<String>,
    pub album_artist: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept the shapes real exports contain.
// ============================================================================

//! Adapter layer: Convert library export DTOs to domain models
//!
//! This is the ONLY place where export DTOs become [`SourceEntity`] values.
//! Absent or blank keys become explicit `None`s here, so nothing downstream
//! has to dig through nested optional data.

use std::collections::{HashMap, HashSet};

use super::dto;
use crate::migration::domain::{SourceCollection, SourceEntity};

/// Name given to playlists exported without one
const UNTITLED_PLAYLIST: &str = "Untitled playlist";

/// Convert exported playlists to source collections, entries in order
pub fn to_collections(playlists: &[dto::Playlist]) -> Vec<SourceCollection> {
    playlists
        .iter()
        .map(|playlist| {
            let name = clean(&playlist.name).unwrap_or_else(|| UNTITLED_PLAYLIST.to_string());
            let entities = playlist.tracks.iter().map(entry_to_entity).collect();
            SourceCollection::new(name, entities)
        })
        .collect()
}

/// Convert the flat songs dump to track entities, skipping songs without an id
pub fn to_library(songs: &[dto::Song]) -> Vec<SourceEntity> {
    songs
        .iter()
        .filter_map(|song| {
            let id = clean(&song.id)?;
            Some(SourceEntity {
                title: clean(&song.title),
                artist: clean(&song.artist),
                ..SourceEntity::track(id, None, None)
            })
        })
        .collect()
}

/// Collect every album referenced by the songs dump, in first-seen order.
///
/// Albums without an info record (no longer publicly available) are kept
/// with no metadata so they are still accounted for downstream.
pub fn to_albums(songs: &[dto::Song], albums: &[dto::AlbumInfo]) -> Vec<SourceEntity> {
    let info: HashMap<String, &dto::AlbumInfo> = albums
        .iter()
        .filter_map(|album| clean(&album.album_id).map(|id| (id, album)))
        .collect();

    let mut seen = HashSet::new();
    songs
        .iter()
        .filter_map(|song| clean(&song.album_id))
        .filter(|id| seen.insert(id.clone()))
        .map(|id| match info.get(&id) {
            Some(album) => SourceEntity {
                title: clean(&album.name),
                artist: clean(&album.album_artist).or_else(|| clean(&album.artist)),
                ..SourceEntity::album(id, None, None)
            },
            None => {
                tracing::info!("Album {} does not exist publicly, no metadata", id);
                SourceEntity::album(id, None, None)
            }
        })
        .collect()
}

/// A playlist entry becomes a track entity. Library-only entries have no
/// embedded metadata and are completed later from the songs dump.
fn entry_to_entity(entry: &dto::PlaylistEntry) -> SourceEntity {
    let id = clean(&entry.track_id)
        .or_else(|| entry.track.as_ref().and_then(|t| clean(&t.id)))
        .unwrap_or_default();

    match &entry.track {
        Some(track) => SourceEntity {
            title: clean(&track.title),
            artist: clean(&track.artist),
            ..SourceEntity::track(id, None, None)
        },
        None => SourceEntity::track(id, None, None),
    }
}

/// Trimmed value, or None for absent/blank strings
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::domain::EntityKind;

    fn song(id: &str, title: Option<&str>, artist: Option<&str>, album_id: Option<&str>) -> dto::Song {
        dto::Song {
            id: Some(id.to_string()),
            title: title.map(String::from),
            artist: artist.map(String::from),
            album: None,
            album_artist: None,
            album_id: album_id.map(String::from),
        }
    }

    fn album_info(id: &str, name: &str, album_artist: Option<&str>) -> dto::AlbumInfo {
        dto::AlbumInfo {
            album_id: Some(id.to_string()),
            name: Some(name.to_string()),
            album_artist: album_artist.map(String::from),
            artist: None,
            year: None,
        }
    }

    #[test]
    fn test_playlist_entries_keep_order() {
        let playlists = vec![dto::Playlist {
            id: None,
            name: Some("Road Trip".to_string()),
            tracks: vec![
                dto::PlaylistEntry {
                    track_id: Some("T1".to_string()),
                    track: Some(song("T1", Some("Bohemian Rhapsody"), Some("Queen"), None)),
                },
                dto::PlaylistEntry {
                    track_id: Some("lib-2".to_string()),
                    track: None,
                },
            ],
        }];

        let collections = to_collections(&playlists);

        assert_eq!(collections.len(), 1);
        let entities = &collections[0].entities;
        assert_eq!(entities[0].id, "T1");
        assert_eq!(entities[0].artist.as_deref(), Some("Queen"));
        assert_eq!(entities[1].id, "lib-2");
        assert!(entities[1].title.is_none() && entities[1].artist.is_none());
        assert!(entities.iter().all(|e| e.kind == EntityKind::Track));
    }

    #[test]
    fn test_unnamed_playlist_gets_placeholder() {
        let playlists = vec![dto::Playlist {
            id: None,
            name: Some("  ".to_string()),
            tracks: vec![],
        }];
        assert_eq!(to_collections(&playlists)[0].name, UNTITLED_PLAYLIST);
    }

    #[test]
    fn test_blank_artist_is_absent() {
        let library = to_library(&[song("s1", Some("Upload"), Some(""), None)]);
        assert_eq!(library[0].title.as_deref(), Some("Upload"));
        assert!(library[0].artist.is_none());
    }

    #[test]
    fn test_songs_without_id_are_skipped() {
        let mut anonymous = song("x", Some("Ghost"), None, None);
        anonymous.id = None;
        assert!(to_library(&[anonymous]).is_empty());
    }

    #[test]
    fn test_albums_deduplicated_in_first_seen_order() {
        let songs = vec![
            song("s1", None, None, Some("B2")),
            song("s2", None, None, Some("B1")),
            song("s3", None, None, Some("B2")),
            song("s4", None, None, None),
        ];
        let albums = vec![
            album_info("B1", "The Wall", Some("Pink Floyd")),
            album_info("B2", "Now 80", Some("Various Artists")),
        ];

        let entities = to_albums(&songs, &albums);

        let ids: Vec<_> = entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "B1"]);
        assert_eq!(entities[0].title.as_deref(), Some("Now 80"));
        assert_eq!(entities[1].artist.as_deref(), Some("Pink Floyd"));
        assert!(entities.iter().all(|e| e.kind == EntityKind::Album));
    }

    #[test]
    fn test_album_without_info_has_no_metadata() {
        let entities = to_albums(&[song("s1", None, None, Some("gone"))], &[]);
        assert_eq!(entities.len(), 1);
        assert!(entities[0].title.is_none() && entities[0].artist.is_none());
    }

    #[test]
    fn test_album_artist_falls_back_to_artist() {
        let mut info = album_info("B1", "Innuendo", None);
        info.artist = Some("Queen".to_string());
        let entities = to_albums(&[song("s1", None, None, Some("B1"))], &[info]);
        assert_eq!(entities[0].artist.as_deref(), Some("Queen"));
    }
}

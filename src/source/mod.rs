//! Source catalog backed by a JSON library export
//!
//! The export holds the user's playlists, the flat song dump and album info
//! records. See [`dto`] for the exact shape.

mod adapter;
pub mod dto;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::migration::domain::{SourceCollection, SourceEntity, SourceError};
use crate::migration::traits::SourceCatalog;

/// A library export loaded into memory
#[derive(Debug, Clone)]
pub struct LibraryExport {
    path: PathBuf,
    export: dto::ExportFile,
}

impl LibraryExport {
    /// Read and parse an export file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let export = Self::parse(&contents)?;
        tracing::info!(
            "Loaded library export {:?}: {} playlist(s), {} song(s), {} album(s)",
            path,
            export.playlists.len(),
            export.songs.len(),
            export.albums.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            export,
        })
    }

    fn parse(contents: &str) -> Result<dto::ExportFile, SourceError> {
        serde_json::from_str(contents).map_err(|e| SourceError::Parse(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SourceCatalog for LibraryExport {
    async fn list_collections(&self) -> Result<Vec<SourceCollection>, SourceError> {
        Ok(adapter::to_collections(&self.export.playlists))
    }

    async fn list_all_entities(&self) -> Result<Vec<SourceEntity>, SourceError> {
        Ok(adapter::to_library(&self.export.songs))
    }

    async fn list_albums(&self) -> Result<Vec<SourceEntity>, SourceError> {
        Ok(adapter::to_albums(&self.export.songs, &self.export.albums))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "playlists": [{
            "name": "Road Trip",
            "tracks": [
                {"trackId": "T1", "track": {"title": "Bohemian Rhapsody", "artist": "Queen"}},
                {"trackId": "lib-2"}
            ]
        }],
        "songs": [
            {"id": "lib-2", "title": "Heroes", "artist": "David Bowie", "albumId": "B7"}
        ],
        "albums": [
            {"albumId": "B7", "name": "\"Heroes\"", "albumArtist": "David Bowie"}
        ]
    }"#;

    fn write_export(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_load_and_list() {
        let (_dir, path) = write_export(EXPORT);

        let export = LibraryExport::load(&path).unwrap();

        assert_eq!(export.path(), path.as_path());
        let collections = export.list_collections().await.unwrap();
        assert_eq!(collections[0].name, "Road Trip");
        assert_eq!(collections[0].entities.len(), 2);
        let library = export.list_all_entities().await.unwrap();
        assert_eq!(library[0].artist.as_deref(), Some("David Bowie"));
        let albums = export.list_albums().await.unwrap();
        assert_eq!(albums[0].title.as_deref(), Some("\"Heroes\""));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = LibraryExport::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(SourceError::Read { .. })));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let (_dir, path) = write_export("{ not json");
        assert!(matches!(LibraryExport::load(&path), Err(SourceError::Parse(_))));
    }
}

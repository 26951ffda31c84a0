//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns for the endpoints we use.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// `GET /search` response. Only the page for the requested type is present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Option<Page>,
    pub albums: Option<Page>,
}

/// A page of search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Items can be null for results that are unavailable in the market
    #[serde(default)]
    pub items: Vec<Option<Item>>,
    pub total: Option<u32>,
}

/// A track or album search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    pub id: Option<String>,
    pub uri: Option<String>,
    pub name: Option<String>,
}

/// `POST /users/{user_id}/playlists` request body
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

/// Created playlist (subset of the full playlist object)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: Option<String>,
}

/// `POST /playlists/{id}/tracks` request body
#[derive(Debug, Clone, Serialize)]
pub struct AddItemsRequest<'a> {
    pub uris: Vec<&'a str>,
}

/// `PUT /me/tracks` and `PUT /me/albums` request body
#[derive(Debug, Clone, Serialize)]
pub struct SaveItemsRequest<'a> {
    pub ids: Vec<&'a str>,
}

/// Error response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_track_search() {
        let json = r#"{
            "tracks": {
                "href": "https://api.spotify.com/v1/search?query=Queen&type=track&offset=0&limit=1",
                "items": [{
                    "id": "4u7EnebtmKWzUH433cf5Qv",
                    "uri": "spotify:track:4u7EnebtmKWzUH433cf5Qv",
                    "name": "Bohemian Rhapsody",
                    "popularity": 85
                }],
                "limit": 1,
                "total": 1000
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse search");

        let page = response.tracks.expect("tracks page");
        assert!(response.albums.is_none());
        assert_eq!(page.total, Some(1000));
        let item = page.items[0].as_ref().unwrap();
        assert_eq!(item.uri.as_deref(), Some("spotify:track:4u7EnebtmKWzUH433cf5Qv"));
    }

    #[test]
    fn test_parse_empty_album_search() {
        let json = r#"{"albums": {"items": [], "total": 0}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("Should parse empty search");
        assert!(response.albums.unwrap().items.is_empty());
    }

    #[test]
    fn test_parse_null_items() {
        let json = r#"{"tracks": {"items": [null], "total": 1}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("Should parse null item");
        assert!(response.tracks.unwrap().items[0].is_none());
    }

    #[test]
    fn test_parse_created_playlist() {
        let json = r#"{"id": "3cEYpjA9oz9GiPac4AsH4n", "name": "Road Trip", "public": false}"#;
        let playlist: CreatedPlaylist = serde_json::from_str(json).expect("Should parse playlist");
        assert_eq!(playlist.id, "3cEYpjA9oz9GiPac4AsH4n");
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"error": {"status": 401, "message": "The access token expired"}}"#;
        let error: ErrorResponse = serde_json::from_str(json).expect("Should parse error");
        assert_eq!(error.error.status, 401);
        assert_eq!(error.error.message, "The access token expired");
    }

    #[test]
    fn test_serialize_create_request() {
        let body = serde_json::to_value(CreatePlaylistRequest {
            name: "Road Trip",
            public: false,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"name": "Road Trip", "public": false}));
    }
}
